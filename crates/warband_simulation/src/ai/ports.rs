//! Collaborator contracts для DecisionCore.
//!
//! DecisionCore не знает про ECS/движок: всё что ему нужно приходит через
//! эти traits (explicit DI). Все вызовы non-blocking, fire-and-return -
//! эффект применяется асинхронно окружающей симуляцией.

use bevy::prelude::*;
use crate::ai::state::AIState;

/// Read-only snapshot агента (резолвится по Entity на каждом использовании)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub position: Vec3,
    /// 0.0..=1.0
    pub health_fraction: f32,
    pub alive: bool,
    pub faction_id: u64,
}

/// Резолвер target handles.
///
/// `Entity` - generation-checked handle: despawned entity → None.
pub trait AgentDirectory {
    fn snapshot(&self, agent: Entity) -> Option<AgentSnapshot>;

    /// Жив ли агент (false для despawned)
    fn is_alive(&self, agent: Entity) -> bool {
        self.snapshot(agent).is_some_and(|s| s.alive)
    }
}

/// Perception service (vision/hearing - вне core)
pub trait PerceptionService {
    fn has_hostiles(&self) -> bool;
    /// Упорядоченный список обнаруженных живых hostiles
    fn detected_hostiles(&self) -> Vec<Entity>;
}

/// Navigation agent (pathfinding/steering - вне core)
pub trait NavigationAgent {
    fn set_destination(&mut self, position: Vec3);
    fn clear_path(&mut self);
    fn remaining_distance(&self) -> f32;
    fn has_path(&self) -> bool;
    fn path_pending(&self) -> bool;
    fn velocity(&self) -> Vec3;
    fn is_on_navigable_surface(&self) -> bool;
    /// Проекция точки на navigable surface в пределах `max_distance`
    fn sample_position(&self, candidate: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Combat executor (attack timing, damage - вне core)
pub trait CombatExecutor {
    fn start_combat(&mut self, target: Entity);
    fn stop_combat(&mut self);
    fn is_in_combat(&self) -> bool;
}

/// Recovery controller (knockdown/ragdoll - вне core). Optional.
pub trait RecoveryController {
    fn is_recovery_active(&self) -> bool;
}

/// Animation sink: только пишем, никогда не читаем
pub trait AnimationDriver {
    fn drive(&mut self, speed: f32, is_moving: bool, state: AIState);
}
