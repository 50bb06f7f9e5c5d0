//! AI Events - входящие от collaborators и исходящие от DecisionCore
//!
//! Входящие: PerceptionEvent (vision), CombatStateChanged (executor),
//! RecoveryCompleted (knockdown timer).
//! Исходящие: AIEvent (state/target/destination notifications).

use bevy::prelude::*;
use crate::ai::state::StateTransition;

/// События perception service
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PerceptionEvent {
    /// Враг обнаружен
    HostileDetected { observer: Entity, target: Entity },

    /// Враг потерян (вышел из зоны видимости или despawned)
    HostileLost { observer: Entity, target: Entity },

    /// Perception сам выбрал цель для observer (None = цели нет)
    TargetChanged {
        observer: Entity,
        target: Option<Entity>,
    },
}

impl PerceptionEvent {
    pub fn observer(&self) -> Entity {
        match self {
            PerceptionEvent::HostileDetected { observer, .. }
            | PerceptionEvent::HostileLost { observer, .. }
            | PerceptionEvent::TargetChanged { observer, .. } => *observer,
        }
    }
}

/// Combat executor сменил состояние (например, цель умерла → бой окончен)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CombatStateChanged {
    pub agent: Entity,
    pub in_combat: bool,
}

/// Knockdown закончился, агент снова на ногах
#[derive(Event, Debug, Clone, PartialEq)]
pub struct RecoveryCompleted {
    pub agent: Entity,
}

/// Notification от DecisionCore (без entity - core не знает кто он)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrainEvent {
    StateChanged(StateTransition),
    TargetFound(Entity),
    TargetLost(Entity),
    DestinationSet(Vec3),
    DestinationReached,
}

/// Notification для владельца/UI/звука
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AIEvent {
    pub agent: Entity,
    pub event: BrainEvent,
}
