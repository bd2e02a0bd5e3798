//! Thread scheduling seam.
//!
//! The engine never spawns threads itself. It asks a [`Scheduler`] whether the
//! caller is the primary simulation thread and hands work to it:
//!
//! | Keyword | Caller on primary | Caller elsewhere |
//! |---------|-------------------|------------------|
//! | sync | run inline | `run_on_primary` (blocks until done) |
//! | async | `spawn_async` | `spawn_async` |

/// A unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Where keyword bodies run.
#[cfg_attr(test, mockall::automock)]
pub trait Scheduler: Send + Sync {
    /// Whether the calling thread is the primary simulation thread.
    fn is_primary_thread(&self) -> bool;

    /// Run `task` on the primary thread and block until it has finished.
    fn run_on_primary(&self, task: Task);

    /// Run `task` on the worker pool without waiting for it.
    fn spawn_async(&self, task: Task);
}

/// Treats every caller as the primary thread and runs async work inline.
///
/// For tests and hosts without a worker pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineScheduler;

impl Scheduler for InlineScheduler {
    fn is_primary_thread(&self) -> bool {
        true
    }

    fn run_on_primary(&self, task: Task) {
        task();
    }

    fn spawn_async(&self, task: Task) {
        task();
    }
}
