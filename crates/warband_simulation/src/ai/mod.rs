//! AI decision-making module
//!
//! Behavioral state machine (Idle / Seeking / Moving / Combat) +
//! target arbitration + per-tick decision loop.
//!
//! Слои:
//! - state / selector / config / decision - engine-agnostic core (pure Rust)
//! - ports - collaborator contracts (perception, navigation, combat, recovery)
//! - adapters / systems - ECS integration (Bevy FixedUpdate)

use bevy::prelude::*;

pub mod adapters;
pub mod components;
pub mod config;
pub mod decision;
pub mod events;
pub mod ports;
pub mod selector;
pub mod state;
pub mod systems;

#[cfg(test)]
mod selector_tests;
#[cfg(test)]
pub(crate) mod test_support;

// Re-export основных типов
pub use components::{AnimationFlags, DecisionSchedule, Dead, Knockdown, SpottedEnemies};
pub use config::{AIProfile, ConfigError, DecisionTiming, RangeConfig, RangeWarning, ScoreWeights};
pub use decision::{DecisionContext, DecisionCore};
pub use events::{AIEvent, BrainEvent, CombatStateChanged, PerceptionEvent, RecoveryCompleted};
pub use selector::{ScoredTarget, TargetCandidate, TargetSelector};
pub use state::{AIState, StateMachine, StateTransition};

/// Фазы FixedUpdate симуляции
///
/// Sensing (perception collaborators) → Decision (AI) → Execution
/// (navigation/combat collaborators).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AISet {
    Sensing,
    Decision,
    Execution,
}

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate.
/// Порядок выполнения (AISet::Decision):
/// 1. tick_knockdown_timers - one-shot recovery таймеры
/// 2. update_spotted_enemies - PerceptionEvent → SpottedEnemies
/// 3. notify_decision_cores - collaborator events → DecisionCore wake
/// 4. handle_agent_death - teardown мёртвых
/// 5. run_decision_ticks - DecisionCore::tick по расписанию
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PerceptionEvent>()
            .add_event::<CombatStateChanged>()
            .add_event::<RecoveryCompleted>()
            .add_event::<AIEvent>();

        app.configure_sets(
            FixedUpdate,
            (AISet::Sensing, AISet::Decision, AISet::Execution).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::tick_knockdown_timers,
                systems::update_spotted_enemies,
                systems::notify_decision_cores,
                systems::handle_agent_death,
                systems::run_decision_ticks,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(AISet::Decision),
        );
    }
}
