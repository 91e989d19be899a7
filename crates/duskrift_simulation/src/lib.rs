//! DUSKRIFT Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: decision-tree контроллеры врагов, таргетинг,
//! combat и движение — headless и детерминистично.
//!
//! HYBRID ARCHITECTURE (ADR-001):
//! - ECS = strategic layer (деревья решений, цели, combat rules)
//! - Engine shell = tactical layer (физика, рендер, navmesh-запросы)

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod movement;
pub mod player;

// Re-export базовых типов для удобства
pub use ai::{
    bind_brain, spawn_enemy, AIBrain, AIPlugin, AgentBindError, ArchetypeRegistry, Decision,
    DecisionContext, DecisionKind, DecisionTree, NodeAction, ResolvedTarget, Stance,
    TargetOverride, TargetSelector, TargetToken, TreeConfigError, TreeDef, TreeNode,
};
pub use combat::{AttackIntent, CombatPlugin, DamageDealt, EntityDied, WeaponStats};
pub use components::*;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use movement::MovementPlugin;
pub use player::{ActivePlayer, Player, PlayerPlugin};

/// Seed по умолчанию (когда App собирается без явного)
pub const DEFAULT_SEED: u64 = 42;

/// Фазы симуляционного тика
///
/// Жёсткая последовательность — часть контракта детерминизма:
/// AI решает → combat применяет → движение интегрирует.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Ai,
    Combat,
    Movement,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        // Детерминистичный RNG: не затираем seed, если App уже задал свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app.configure_sets(
            FixedUpdate,
            (SimSet::Ai, SimSet::Combat, SimSet::Movement).chain(),
        );

        // Подсистемы (ECS strategic layer)
        app.add_plugins((PlayerPlugin, AIPlugin, CombatPlugin, MovementPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Виртуальное время продвигается вручную ровно на период тика за один
/// app.update() (ADR-003): циклы `for _ in 0..n { app.update() }` дают
/// ровно n FixedUpdate тиков, без зависимости от wall-clock.
/// Первый update — startup-кадр Bevy (delta = 0, тиков не порождает).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();

    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия: Debug-формат компонентов, сортировка по Entity ID)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
