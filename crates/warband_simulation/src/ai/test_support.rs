//! Mock collaborators для unit тестов DecisionCore.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use crate::ai::config::AIProfile;
use crate::ai::decision::{DecisionContext, DecisionCore};
use crate::ai::events::BrainEvent;
use crate::ai::ports::{
    AgentDirectory, AgentSnapshot, AnimationDriver, CombatExecutor, NavigationAgent,
    PerceptionService, RecoveryController,
};
use crate::ai::state::{AIState, StateTransition};

pub const OWN_FACTION: u64 = 1;
pub const ENEMY_FACTION: u64 = 2;

#[derive(Default)]
pub struct MockPerception {
    pub hostiles: Vec<Entity>,
}

impl PerceptionService for MockPerception {
    fn has_hostiles(&self) -> bool {
        !self.hostiles.is_empty()
    }

    fn detected_hostiles(&self) -> Vec<Entity> {
        self.hostiles.clone()
    }
}

#[derive(Default)]
pub struct MockDirectory {
    pub agents: HashMap<Entity, AgentSnapshot>,
}

impl AgentDirectory for MockDirectory {
    fn snapshot(&self, agent: Entity) -> Option<AgentSnapshot> {
        self.agents.get(&agent).copied()
    }
}

pub struct MockNavigation {
    pub destinations: Vec<Vec3>,
    pub clears: usize,
    pub has_path: bool,
    pub path_pending: bool,
    pub remaining_distance: f32,
    pub velocity: Vec3,
    pub on_surface: bool,
    /// false → sample_position всегда None
    pub sample_valid: bool,
}

impl Default for MockNavigation {
    fn default() -> Self {
        Self {
            destinations: Vec::new(),
            clears: 0,
            has_path: false,
            path_pending: false,
            remaining_distance: 0.0,
            velocity: Vec3::ZERO,
            on_surface: true,
            sample_valid: true,
        }
    }
}

impl MockNavigation {
    /// Агент дошёл: путь пуст, стоим
    pub fn arrive(&mut self) {
        self.has_path = false;
        self.path_pending = false;
        self.remaining_distance = 0.0;
        self.velocity = Vec3::ZERO;
    }

    /// Путь принят, идём
    pub fn walking(&mut self, remaining: f32) {
        self.has_path = true;
        self.path_pending = false;
        self.remaining_distance = remaining;
        self.velocity = Vec3::X * 3.0;
    }
}

impl NavigationAgent for MockNavigation {
    fn set_destination(&mut self, position: Vec3) {
        self.destinations.push(position);
        self.has_path = true;
        self.path_pending = true;
    }

    fn clear_path(&mut self) {
        self.clears += 1;
        self.has_path = false;
        self.path_pending = false;
        self.remaining_distance = 0.0;
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    fn has_path(&self) -> bool {
        self.has_path
    }

    fn path_pending(&self) -> bool {
        self.path_pending
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn is_on_navigable_surface(&self) -> bool {
        self.on_surface
    }

    fn sample_position(&self, candidate: Vec3, _max_distance: f32) -> Option<Vec3> {
        self.sample_valid.then_some(candidate)
    }
}

#[derive(Default)]
pub struct MockCombat {
    pub starts: Vec<Entity>,
    pub stops: usize,
    pub in_combat: bool,
}

impl CombatExecutor for MockCombat {
    fn start_combat(&mut self, target: Entity) {
        self.starts.push(target);
        self.in_combat = true;
    }

    fn stop_combat(&mut self) {
        self.stops += 1;
        self.in_combat = false;
    }

    fn is_in_combat(&self) -> bool {
        self.in_combat
    }
}

pub struct MockRecovery {
    pub active: bool,
}

impl RecoveryController for MockRecovery {
    fn is_recovery_active(&self) -> bool {
        self.active
    }
}

#[derive(Default)]
pub struct MockAnimation {
    pub frames: Vec<(f32, bool, AIState)>,
}

impl AnimationDriver for MockAnimation {
    fn drive(&mut self, speed: f32, is_moving: bool, state: AIState) {
        self.frames.push((speed, is_moving, state));
    }
}

/// Агент в начале координат + mock окружение
pub struct Harness {
    pub world: World,
    pub core: DecisionCore,
    pub position: Vec3,
    pub perception: MockPerception,
    pub directory: MockDirectory,
    pub navigation: MockNavigation,
    pub combat: MockCombat,
    pub recovery: MockRecovery,
    pub animation: MockAnimation,
    pub with_navigation: bool,
    pub with_combat: bool,
    pub rng: ChaCha8Rng,
    pub events: Vec<BrainEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_profile(AIProfile::default())
    }

    pub fn with_profile(profile: AIProfile) -> Self {
        Self {
            world: World::new(),
            core: DecisionCore::new(profile, Vec3::ZERO),
            position: Vec3::ZERO,
            perception: MockPerception::default(),
            directory: MockDirectory::default(),
            navigation: MockNavigation::default(),
            combat: MockCombat::default(),
            recovery: MockRecovery { active: false },
            animation: MockAnimation::default(),
            with_navigation: true,
            with_combat: true,
            rng: ChaCha8Rng::seed_from_u64(7),
            events: Vec::new(),
        }
    }

    /// Враг на (distance, 0, 0), сразу виден perception
    pub fn spawn_hostile(&mut self, distance: f32) -> Entity {
        self.spawn_hostile_with_health(distance, 1.0)
    }

    pub fn spawn_hostile_with_health(&mut self, distance: f32, health_fraction: f32) -> Entity {
        let entity = self.world.spawn_empty().id();
        self.directory.agents.insert(
            entity,
            AgentSnapshot {
                position: Vec3::new(distance, 0.0, 0.0),
                health_fraction,
                alive: true,
                faction_id: ENEMY_FACTION,
            },
        );
        self.perception.hostiles.push(entity);
        entity
    }

    /// Союзник на (distance, 0, 0); perception его не сообщает
    pub fn spawn_ally(&mut self, distance: f32) -> Entity {
        let entity = self.world.spawn_empty().id();
        self.directory.agents.insert(
            entity,
            AgentSnapshot {
                position: Vec3::new(distance, 0.0, 0.0),
                health_fraction: 1.0,
                alive: true,
                faction_id: OWN_FACTION,
            },
        );
        entity
    }

    pub fn place(&mut self, entity: Entity, position: Vec3) {
        if let Some(snapshot) = self.directory.agents.get_mut(&entity) {
            snapshot.position = position;
        }
    }

    pub fn move_to_distance(&mut self, entity: Entity, distance: f32) {
        self.place(entity, Vec3::new(distance, 0.0, 0.0));
    }

    pub fn kill(&mut self, entity: Entity) {
        if let Some(snapshot) = self.directory.agents.get_mut(&entity) {
            snapshot.alive = false;
            snapshot.health_fraction = 0.0;
        }
    }

    /// Entity уничтожена: handle больше не резолвится
    pub fn despawn(&mut self, entity: Entity) {
        self.directory.agents.remove(&entity);
        self.perception.hostiles.retain(|&e| e != entity);
    }

    pub fn hide(&mut self, entity: Entity) {
        self.perception.hostiles.retain(|&e| e != entity);
    }

    pub fn tick(&mut self, dt: f32) {
        let Self {
            core,
            position,
            perception,
            directory,
            navigation,
            combat,
            recovery,
            animation,
            with_navigation,
            with_combat,
            rng,
            events,
            ..
        } = self;

        let mut ctx = DecisionContext {
            position: *position,
            faction_id: OWN_FACTION,
            perception: &*perception,
            directory: &*directory,
            navigation: with_navigation.then_some(navigation as &mut dyn NavigationAgent),
            combat: with_combat.then_some(combat as &mut dyn CombatExecutor),
            recovery: Some(&*recovery),
            animation: Some(animation as &mut dyn AnimationDriver),
            rng,
        };
        core.tick(&mut ctx, dt);
        events.extend(core.drain_events());
    }

    pub fn ticks(&mut self, count: usize, dt: f32) {
        for _ in 0..count {
            self.tick(dt);
        }
    }

    pub fn recover(&mut self) {
        let Self {
            core,
            position,
            perception,
            directory,
            navigation,
            combat,
            recovery,
            rng,
            events,
            ..
        } = self;

        let mut ctx = DecisionContext {
            position: *position,
            faction_id: OWN_FACTION,
            perception: &*perception,
            directory: &*directory,
            navigation: Some(navigation as &mut dyn NavigationAgent),
            combat: Some(combat as &mut dyn CombatExecutor),
            recovery: Some(&*recovery),
            animation: None,
            rng,
        };
        core.on_recovery_completed(&mut ctx);
        events.extend(core.drain_events());
    }

    pub fn state(&self) -> AIState {
        self.core.current_state()
    }

    pub fn transitions(&self) -> Vec<StateTransition> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BrainEvent::StateChanged(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// Idle → Seeking → Combat с врагом на 1.8м
    pub fn engaged() -> (Self, Entity) {
        let mut harness = Self::new();
        let enemy = harness.spawn_hostile(1.8);
        harness.ticks(2, 0.1);
        assert_eq!(harness.state(), AIState::Combat);
        (harness, enemy)
    }
}
