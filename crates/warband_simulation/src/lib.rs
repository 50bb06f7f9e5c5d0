//! WARBAND Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: AI агентов ближнего боя.
//!
//! Слои:
//! - ai = decision layer (state machine, target selection, decision loop)
//! - sim = headless collaborators (vision, navigation, melee) для прогона без движка
//! - components = общие компоненты агентов (health, faction, movement, combat intent)

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod components;
pub mod logger;
pub mod sim;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::{AIEvent, AIPlugin, AIProfile, AISet, AIState, DecisionCore, RangeConfig};
pub use components::*;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    LogLevel, LogPrinter,
};
pub use sim::{DamageDealt, EntityDied, HeadlessPlugin, VisionRange};
pub use spawn::{agent_bundle, spawn_teams, stagger_phase};

/// Fixed timestep симуляции (60Hz)
pub const FIXED_TIMESTEP: Duration = Duration::from_nanos(16_666_667);

/// Seed по умолчанию (если DeterministicRng не вставлен заранее)
pub const DEFAULT_SEED: u64 = 42;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed от create_headless_app / владельца не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_duration(FIXED_TIMESTEP))
            .add_plugins((AIPlugin, HeadlessPlugin));
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
/// Время двигается вручную: каждый `app.update()` = ровно один FixedUpdate
/// tick (кроме самого первого update, у него delta = 0).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(FIXED_TIMESTEP))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_TIMESTEP));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
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
