//! End-to-end tests: ability text through the compiler and into the engine.

use std::sync::Arc;
use std::thread;

use relic_ability::{
    AbilityCache, AbilityCompiler, AbilityEngine, AbilitySet, AbilityTrigger, ArgumentSchema,
    Arguments, FunctionRegistry, Keyword, Refusal, RuntimeContext,
};
use relic_core::{AbilityFile, EngineConfig, Entity, Location, World};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("relic_ability=debug"))
        .try_init();
}

fn compiler() -> AbilityCompiler {
    AbilityCompiler::new(Arc::new(FunctionRegistry::with_builtins().unwrap()))
}

fn player() -> Arc<Entity> {
    Arc::new(Entity::player("alex", Location::default()))
}

fn world() -> Arc<World> {
    Arc::new(World::new("overworld"))
}

fn strict() -> EngineConfig {
    EngineConfig {
        strict: true,
        ..EngineConfig::default()
    }
}

#[test]
fn test_bad_argument_drops_only_its_line() {
    init_tracing();
    let compilation = compiler()
        .compile(
            &["damage(@target,5)", "heal(@player,bogus)"],
            "damage-taken",
            "thorns",
        )
        .unwrap();

    let keywords = compilation.ability.keywords();
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords[0].identifier(), "damage");
    assert_eq!(compilation.diagnostics.len(), 1);
}

#[test]
fn test_argument_count_mismatch_is_line_local() {
    init_tracing();
    let compilation = compiler()
        .compile(
            &["heal(?player)", "heal(?player, 1, 2)", "heal(?player, 1)"],
            "right-click",
            "patch",
        )
        .unwrap();

    assert_eq!(compilation.ability.keywords().len(), 1);
    assert_eq!(compilation.diagnostics.len(), 2);
    assert_eq!(compilation.diagnostics[0].line, 0);
    assert_eq!(compilation.diagnostics[1].line, 1);
}

#[test]
fn test_compilation_is_deterministic() {
    let lines = [
        "damage(?entity, 4.5)",
        "effect(?entity, poison, 100, 0)",
        "message(?player, &cGotcha)",
        "explode(?entity)",
    ];
    let compiler = compiler();

    let first = compiler.compile(&lines, "damage-dealt", "venom").unwrap();
    let second = compiler.compile(&lines, "damage-dealt", "venom").unwrap();

    assert_eq!(first.ability, second.ability);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_strict_right_click_refuses_entity_keyword() {
    init_tracing();
    let ability = compiler()
        .compile(&["heal(?player, 2)", "damage(@target, 5)"], "right-click", "smite")
        .unwrap()
        .ability;

    let player = player();
    player.set_health(10.0);
    let context = RuntimeContext::new("smite", AbilityTrigger::RightClick, player.clone(), world());

    let engine = AbilityEngine::inline(strict());
    assert!(matches!(
        engine.try_execute(&ability, context),
        Err(Refusal::UnsupportedTargeter { .. })
    ));
    assert_eq!(player.health(), 10.0);
}

#[test]
fn test_missing_capability_is_noop_not_abort() {
    init_tracing();
    let ability = compiler()
        .compile(
            &["damage(?entity, 5)", "heal(?player, 3)"],
            "right-click",
            "smite",
        )
        .unwrap()
        .ability;

    let player = player();
    player.set_health(10.0);
    let context = RuntimeContext::new("smite", AbilityTrigger::RightClick, player.clone(), world());

    let engine = AbilityEngine::inline(EngineConfig::default());
    let execution = engine.try_execute(&ability, context).unwrap();

    assert_eq!(execution.completed, 2);
    assert_eq!(player.health(), 13.0);
}

#[test]
fn test_sethealth_clamps_to_max_health() {
    let compiler = compiler();
    let engine = AbilityEngine::inline(EngineConfig::default());
    let player = player();
    player.set_max_health(100.0);
    player.set_health(50.0);

    let overheal = compiler
        .compile(&["sethealth(@player, 150)"], "right-click", "overheal")
        .unwrap()
        .ability;
    let context = RuntimeContext::new("overheal", AbilityTrigger::RightClick, player.clone(), world());
    assert!(engine.execute(&overheal, context));
    assert_eq!(player.health(), 100.0);

    let drain = compiler
        .compile(&["sethealth(@player, -10)"], "right-click", "drain")
        .unwrap()
        .ability;
    let context = RuntimeContext::new("drain", AbilityTrigger::RightClick, player.clone(), world());
    assert!(engine.execute(&drain, context));
    assert_eq!(player.health(), 0.0);
}

/// Swaps the cache for an empty set when called.
struct ReloadKeyword {
    cache: Arc<AbilityCache>,
}

impl Keyword for ReloadKeyword {
    fn identifier(&self) -> &str {
        "reload"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &[]
    }

    fn call(&self, _arguments: &Arguments, _context: &RuntimeContext) {
        self.cache.reload(AbilitySet::new());
    }
}

#[test]
fn test_reload_mid_execution_keeps_old_ability() {
    init_tracing();
    let cache = Arc::new(AbilityCache::default());

    let mut registry = FunctionRegistry::with_builtins().unwrap();
    registry
        .register_keyword(Arc::new(ReloadKeyword {
            cache: Arc::clone(&cache),
        }))
        .unwrap();
    let compiler = AbilityCompiler::new(Arc::new(registry));

    let compilation = compiler
        .compile(
            &["heal(?player, 1)", "reload()", "heal(?player, 1)"],
            "none",
            "refresh",
        )
        .unwrap();
    assert!(compilation.diagnostics.is_empty());
    cache.reload(AbilitySet::from_iter([compilation.ability]));

    let player = player();
    player.set_health(10.0);
    let engine = AbilityEngine::inline(EngineConfig::default());
    let execution = engine
        .execute_by_name(&cache, "refresh", player.clone(), world())
        .unwrap();

    assert_eq!(execution.completed, 3);
    assert_eq!(player.health(), 12.0);
    assert!(cache.is_empty());
}

#[test]
fn test_concurrent_reload_never_tears() {
    let source_a = r#"
        [abilities.alpha]
        trigger = "none"
        keywords = ["heal(?player, 1)"]

        [abilities.beta]
        trigger = "none"
        keywords = ["heal(?player, 1)"]
    "#;
    let source_b = r#"
        [abilities.gamma]
        trigger = "none"
        keywords = ["damage(?player, 1)"]

        [abilities.delta]
        trigger = "none"
        keywords = ["damage(?player, 1)"]
    "#;

    let compiler = compiler();
    let set_a = compiler
        .compile_all(&AbilityFile::from_toml_str(source_a).unwrap())
        .abilities;
    let set_b = compiler
        .compile_all(&AbilityFile::from_toml_str(source_b).unwrap())
        .abilities;

    let cache = Arc::new(AbilityCache::new(set_a.clone()));
    let engine = AbilityEngine::inline(EngineConfig::default());

    thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let player = player();
            for _ in 0..500 {
                let snapshot = cache.snapshot();
                let names = snapshot.names();
                assert!(
                    names == ["alpha", "beta"] || names == ["delta", "gamma"],
                    "torn snapshot: {:?}",
                    names
                );
                for ability in snapshot.iter() {
                    let context = RuntimeContext::new(
                        ability.name(),
                        AbilityTrigger::None,
                        player.clone(),
                        world(),
                    );
                    assert!(engine.execute(ability, context));
                }
            }
        });

        for i in 0..200 {
            let next = if i % 2 == 0 { set_b.clone() } else { set_a.clone() };
            cache.reload(next);
        }

        reader.join().unwrap();
    });
}
