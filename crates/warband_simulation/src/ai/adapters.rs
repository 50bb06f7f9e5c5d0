//! ECS-backed collaborators: реализации ports поверх компонентов.
//!
//! Собираются на один decision tick в run_decision_ticks и живут только
//! на время tick (борроу компонентов агента).

use bevy::prelude::*;
use crate::ai::components::SpottedEnemies;
use crate::ai::ports::{
    AgentDirectory, AgentSnapshot, CombatExecutor, NavigationAgent, PerceptionService,
    RecoveryController,
};
use crate::components::{Actor, CombatIntent, Health, MovementCommand, NavBounds, NavigationState};

/// Read-only query всех агентов (target resolution)
pub type AgentQuery<'w, 's> = Query<'w, 's, (&'static Transform, &'static Health, &'static Actor)>;

/// AgentDirectory поверх ECS query
pub struct EcsDirectory<'a, 'w, 's> {
    pub agents: &'a AgentQuery<'w, 's>,
}

impl AgentDirectory for EcsDirectory<'_, '_, '_> {
    fn snapshot(&self, agent: Entity) -> Option<AgentSnapshot> {
        let (transform, health, actor) = self.agents.get(agent).ok()?;
        Some(AgentSnapshot {
            position: transform.translation,
            health_fraction: health.fraction(),
            alive: health.is_alive(),
            faction_id: actor.faction_id,
        })
    }
}

/// PerceptionService поверх SpottedEnemies (мёртвые/despawned отфильтрованы)
pub struct EcsPerception<'a> {
    pub spotted: &'a SpottedEnemies,
    pub directory: &'a dyn AgentDirectory,
}

impl PerceptionService for EcsPerception<'_> {
    fn has_hostiles(&self) -> bool {
        self.spotted
            .enemies
            .iter()
            .any(|&enemy| self.directory.is_alive(enemy))
    }

    fn detected_hostiles(&self) -> Vec<Entity> {
        self.spotted
            .enemies
            .iter()
            .copied()
            .filter(|&enemy| self.directory.is_alive(enemy))
            .collect()
    }
}

/// NavigationAgent поверх MovementCommand + NavigationState
pub struct EcsNavigation<'a> {
    pub command: &'a mut MovementCommand,
    pub state: &'a mut NavigationState,
    pub bounds: Option<&'a NavBounds>,
}

impl NavigationAgent for EcsNavigation<'_> {
    fn set_destination(&mut self, position: Vec3) {
        *self.command = MovementCommand::MoveToPosition { target: position };
        self.state.path_pending = true;
        self.state.destination = Some(position);
    }

    fn clear_path(&mut self) {
        *self.command = MovementCommand::Stop;
        self.state.path_pending = false;
        self.state.has_path = false;
        self.state.remaining_distance = 0.0;
        self.state.destination = None;
    }

    fn remaining_distance(&self) -> f32 {
        self.state.remaining_distance
    }

    fn has_path(&self) -> bool {
        self.state.has_path
    }

    fn path_pending(&self) -> bool {
        self.state.path_pending
    }

    fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    fn is_on_navigable_surface(&self) -> bool {
        self.state.on_navigable_surface
    }

    fn sample_position(&self, candidate: Vec3, max_distance: f32) -> Option<Vec3> {
        match self.bounds {
            Some(bounds) => bounds.sample(candidate, max_distance),
            None => Some(candidate),
        }
    }
}

/// CombatExecutor поверх CombatIntent
pub struct EcsCombat<'a> {
    pub intent: &'a mut CombatIntent,
}

impl CombatExecutor for EcsCombat<'_> {
    fn start_combat(&mut self, target: Entity) {
        self.intent.engage(target);
    }

    fn stop_combat(&mut self) {
        self.intent.disengage();
    }

    fn is_in_combat(&self) -> bool {
        self.intent.engaged
    }
}

/// RecoveryController: активен пока на агенте висит Knockdown
pub struct KnockdownRecovery {
    pub active: bool,
}

impl RecoveryController for KnockdownRecovery {
    fn is_recovery_active(&self) -> bool {
        self.active
    }
}
