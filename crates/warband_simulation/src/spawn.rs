//! Spawn helpers: полный набор компонентов AI агента.

use bevy::prelude::*;
use crate::ai::{AIProfile, AnimationFlags, DecisionCore, DecisionSchedule, SpottedEnemies};
use crate::components::{
    Actor, Attacker, CombatIntent, Health, MovementCommand, MovementSpeed, NavigationState,
};
use crate::sim::VisionRange;

/// Расстояние между бойцами в шеренге (метры)
const LINE_SPACING: f32 = 3.0;

/// Шеренги команд стоят на ±TEAM_OFFSET по X
const TEAM_OFFSET: f32 = 6.0;

/// Агент с AI + headless collaborators
///
/// `phase` - стартовая фаза DecisionSchedule в [0, 1) (см. `stagger_phase`).
pub fn agent_bundle(faction_id: u64, position: Vec3, profile: AIProfile, phase: f32) -> impl Bundle {
    (
        Actor::new(faction_id),
        Transform::from_translation(position),
        Health::default(),
        DecisionCore::new(profile, position),
        DecisionSchedule::with_phase(profile.timing.decision_interval, phase),
        SpottedEnemies::default(),
        MovementCommand::default(),
        NavigationState::with_stopping_distance(profile.ranges.stopping_distance),
        MovementSpeed::default(),
        CombatIntent::default(),
        Attacker::default(),
        AnimationFlags::default(),
        VisionRange {
            radius: profile.ranges.seek_radius,
        },
    )
}

/// Детерминированная фаза для i-го агента (golden ratio sequence)
pub fn stagger_phase(index: usize) -> f32 {
    const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;
    (index as f32 * GOLDEN_RATIO_CONJUGATE).fract()
}

/// Две команды (faction 1 и 2) шеренгами друг напротив друга
pub fn spawn_teams(world: &mut World, profile: AIProfile, agents_per_team: usize) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(agents_per_team * 2);
    let half_line = (agents_per_team.saturating_sub(1)) as f32 * LINE_SPACING / 2.0;

    for (team, (faction_id, x)) in [(1, -TEAM_OFFSET), (2, TEAM_OFFSET)].into_iter().enumerate() {
        for slot in 0..agents_per_team {
            let z = slot as f32 * LINE_SPACING - half_line;
            let phase = stagger_phase(team * agents_per_team + slot);
            let entity = world
                .spawn(agent_bundle(faction_id, Vec3::new(x, 0.0, z), profile, phase))
                .id();
            spawned.push(entity);
        }
    }

    crate::log_info(&format!(
        "🪖 Spawned {} agents ({} per team)",
        spawned.len(),
        agents_per_team
    ));
    spawned
}
