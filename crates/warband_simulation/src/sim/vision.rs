//! Proximity vision - headless замена VisionCone.
//!
//! Poll-based: каждый tick собираем живых врагов в радиусе, сравниваем с
//! прошлым tick → HostileDetected / HostileLost.

use bevy::prelude::*;
use std::collections::HashMap;
use crate::ai::{Dead, PerceptionEvent};
use crate::components::{Actor, Health};

/// Радиус обзора агента (метры)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct VisionRange {
    pub radius: f32,
}

impl Default for VisionRange {
    fn default() -> Self {
        Self { radius: 15.0 }
    }
}

/// Кто кого видел на прошлом tick (observer → targets, ближние первыми)
#[derive(Resource, Debug, Default)]
pub struct VisionTracking {
    pub spotted: HashMap<Entity, Vec<Entity>>,
}

/// System: proximity vision → PerceptionEvent
///
/// Союзники, мёртвые и сам observer не видны. Порядок detection -
/// по дистанции, затем по Entity (детерминизм ничьих в TargetSelector).
pub fn proximity_vision(
    observers: Query<(Entity, &Transform, &Actor, &VisionRange), Without<Dead>>,
    targets: Query<(Entity, &Transform, &Actor, &Health)>,
    mut tracking: ResMut<VisionTracking>,
    mut events: EventWriter<PerceptionEvent>,
) {
    // Мёртвые/despawned observers больше не отслеживаем
    tracking.spotted.retain(|observer, _| observers.contains(*observer));

    for (observer, transform, actor, vision) in observers.iter() {
        let origin = transform.translation;

        let mut visible: Vec<(f32, Entity)> = targets
            .iter()
            .filter(|(target, _, target_actor, health)| {
                *target != observer && health.is_alive() && actor.is_hostile_to(target_actor)
            })
            .map(|(target, target_transform, _, _)| {
                (origin.distance(target_transform.translation), target)
            })
            .filter(|(distance, _)| *distance <= vision.radius)
            .collect();
        visible.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let current: Vec<Entity> = visible.into_iter().map(|(_, target)| target).collect();

        let previous = tracking.spotted.entry(observer).or_default();

        for &target in current.iter().filter(|t| !previous.contains(t)) {
            events.write(PerceptionEvent::HostileDetected { observer, target });
        }
        for &target in previous.iter().filter(|t| !current.contains(t)) {
            events.write(PerceptionEvent::HostileLost { observer, target });
        }

        *previous = current;
    }
}
