//! Threaded simulation host.
//!
//! Game state mutation belongs to one primary thread. We run that thread as a
//! dedicated OS thread draining a request channel, and keep a tokio
//! multi-thread runtime next to it for async keywords:
//!
//! ```text
//! event thread ──run_on_primary──▶ mpsc ──▶ primary thread (sync keywords)
//!      │                                         ▲
//!      └──────spawn_async──▶ tokio workers       │ ticks
//!                                ticker ─────────┘
//! ```

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use relic_ability::{Scheduler, Task};
use relic_core::EngineConfig;
use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::oneshot;

/// Errors from the simulation host.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to start runtime: {0}")]
    Start(String),

    #[error("Primary thread is not running")]
    Unavailable,

    #[error("Primary thread dropped the response channel")]
    Channel,
}

/// Request types for the primary thread.
pub enum PrimaryRequest {
    /// Run a task on the primary thread.
    Run(Task),
    Shutdown,
}

/// A primary simulation thread plus a worker pool.
pub struct SimulationRuntime {
    tx: mpsc::Sender<PrimaryRequest>,
    primary: ThreadId,
    tick_millis: u64,
    handle: Handle,
    workers: Option<Runtime>,
    _thread: JoinHandle<()>,
}

impl SimulationRuntime {
    /// Start the primary thread and the worker pool.
    pub fn new(config: &EngineConfig) -> Result<Self, RuntimeError> {
        let workers = Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name("relic-worker")
            .enable_time()
            .build()
            .map_err(|e| RuntimeError::Start(e.to_string()))?;

        let (tx, rx) = mpsc::channel();

        // Dedicated OS thread, never a tokio task
        let thread = thread::Builder::new()
            .name("relic-primary".to_string())
            .spawn(move || {
                tracing::info!("Primary thread started");

                while let Ok(request) = rx.recv() {
                    match request {
                        PrimaryRequest::Run(task) => task(),
                        PrimaryRequest::Shutdown => {
                            tracing::info!("Primary thread shutting down");
                            break;
                        }
                    }
                }
            })
            .map_err(|e| RuntimeError::Start(e.to_string()))?;

        Ok(Self {
            tx,
            primary: thread.thread().id(),
            tick_millis: config.tick_millis,
            handle: workers.handle().clone(),
            workers: Some(workers),
            _thread: thread,
        })
    }

    /// Enqueue a task on the primary thread without waiting for it.
    pub fn submit(&self, task: Task) -> Result<(), RuntimeError> {
        self.tx
            .send(PrimaryRequest::Run(task))
            .map_err(|_| RuntimeError::Unavailable)
    }

    /// Run a task on the primary thread and block until it has finished.
    ///
    /// Runs inline when called from the primary thread. The wait goes through a
    /// std channel, so this may be called from inside a tokio runtime; it still
    /// parks that worker, so async callers should prefer
    /// [`with_primary`](Self::with_primary).
    pub fn try_run_on_primary(&self, task: Task) -> Result<(), RuntimeError> {
        if self.is_primary() {
            task();
            return Ok(());
        }

        // tokio's blocking_recv panics inside a runtime context
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        self.submit(Box::new(move || {
            task();
            let _ = done_tx.send(());
        }))?;
        done_rx.recv().map_err(|_| RuntimeError::Channel)
    }

    /// Run a closure on the primary thread and await its result.
    pub async fn with_primary<F, T>(&self, f: F) -> Result<T, RuntimeError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.submit(Box::new(move || {
            let _ = resp_tx.send(f());
        }))?;
        resp_rx.await.map_err(|_| RuntimeError::Channel)
    }

    /// Call `on_tick` on the primary thread once per configured tick, starting
    /// at tick 1. Stops when the runtime shuts down.
    pub fn spawn_ticker<F>(&self, on_tick: F) -> tokio::task::JoinHandle<()>
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        let tx = self.tx.clone();
        let period = Duration::from_millis(self.tick_millis.max(1));
        let on_tick = Arc::new(on_tick);

        self.handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;

            let mut tick = 0u64;
            loop {
                interval.tick().await;
                tick += 1;
                let on_tick = Arc::clone(&on_tick);
                if tx
                    .send(PrimaryRequest::Run(Box::new(move || on_tick(tick))))
                    .is_err()
                {
                    break;
                }
            }
        })
    }

    /// Whether the calling thread is the primary thread.
    pub fn is_primary(&self) -> bool {
        thread::current().id() == self.primary
    }

    /// Handle to the worker pool.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Stop the primary thread. Queued tasks ahead of the request still run.
    pub fn shutdown(&self) {
        let _ = self.tx.send(PrimaryRequest::Shutdown);
    }
}

impl Scheduler for SimulationRuntime {
    fn is_primary_thread(&self) -> bool {
        self.is_primary()
    }

    fn run_on_primary(&self, task: Task) {
        if let Err(e) = self.try_run_on_primary(task) {
            tracing::warn!("Dropped primary-thread task: {}", e);
        }
    }

    fn spawn_async(&self, task: Task) {
        self.handle.spawn(async move { task() });
    }
}

impl Drop for SimulationRuntime {
    fn drop(&mut self) {
        self.shutdown();
        // Never blocks, so the runtime can be dropped from async code
        if let Some(workers) = self.workers.take() {
            workers.shutdown_background();
        }
    }
}
