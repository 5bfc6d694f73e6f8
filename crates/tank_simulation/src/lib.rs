//! Tank Simulation Core
//!
//! ECS-симуляция боевого танка на Bevy 0.16
//!
//! Разделение ответственности:
//! - симуляция = решения FSM, cooldown, урон, эффект уничтожения
//! - движок/хост = рендер, спавн снарядов (CannonFired), коллизии (ShellHit)
//!
//! Для использования без ECS есть `ai::TankController` (те же правила FSM).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod error;
pub mod logger;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{
    CannonFired, PatrolRoute, TankAiPlugin, TankBrain, TankConfig, TankController, TankDestroyed,
    TankMode,
};
pub use combat::{CombatPlugin, DespawnAfter, ShellHit, ShotCooldown};
pub use components::*;
pub use error::TankSetupError;
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};

/// Частота FixedUpdate (тиков в секунду)
pub const SIMULATION_HZ: f64 = 60.0;

/// Длительность одного тика симуляции
pub fn fixed_timestep() -> Duration {
    Duration::from_secs_f64(1.0 / SIMULATION_HZ)
}

/// Порядок внутри FixedUpdate
///
/// DamageIntake → Decide → Effects: урон этого тика виден FSM,
/// а взрыв применяется в том же тике, в котором танк умер.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TankSimSet {
    /// ShellHit → Health
    DamageIntake,
    /// init + тик FSM
    Decide,
    /// TankDestroyed → физика, отложенный despawn
    Effects,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_duration(fixed_timestep()));

        // Seed по умолчанию, если хост не вставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.configure_sets(
            FixedUpdate,
            (
                TankSimSet::DamageIntake,
                TankSimSet::Decide,
                TankSimSet::Effects,
            )
                .chain(),
        )
        .add_plugins((CombatPlugin, TankAiPlugin));
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
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Headless App, где каждый `update()` — ровно один тик FixedUpdate
///
/// Реальное время не используется → тесты и реплеи детерминированы.
pub fn create_stepped_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(fixed_timestep()));
    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
