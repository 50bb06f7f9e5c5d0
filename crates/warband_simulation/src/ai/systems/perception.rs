//! Perception bookkeeping: SpottedEnemies + пересылка событий в DecisionCore.

use bevy::prelude::*;
use crate::ai::components::SpottedEnemies;
use crate::ai::decision::DecisionCore;
use crate::ai::events::{CombatStateChanged, PerceptionEvent};
use crate::components::{Actor, Health};

/// Система: обновление SpottedEnemies из PerceptionEvent
///
/// Читает HostileDetected/HostileLost/TargetChanged → обновляет SpottedEnemies.
/// Также очищает мёртвые entities из списка (perception не отправляет
/// HostileLost при смерти).
/// Фильтрация по фракциям: добавляем только врагов (разные faction_id).
pub fn update_spotted_enemies(
    mut observers: Query<(&mut SpottedEnemies, &Actor)>,
    mut perception_events: EventReader<PerceptionEvent>,
    actors: Query<&Actor>,
    potential_targets: Query<&Health>,
) {
    for event in perception_events.read() {
        match *event {
            PerceptionEvent::HostileDetected { observer, target }
            | PerceptionEvent::TargetChanged {
                observer,
                target: Some(target),
            } => {
                let Ok((mut spotted, observer_actor)) = observers.get_mut(observer) else {
                    continue;
                };
                let Ok(target_actor) = actors.get(target) else {
                    continue;
                };

                // Союзник - игнорируем
                if !observer_actor.is_hostile_to(target_actor) {
                    continue;
                }

                if spotted.insert(target) {
                    crate::log(&format!(
                        "👁️ HostileDetected: {:?} spotted {:?} (faction {} vs {})",
                        observer, target, observer_actor.faction_id, target_actor.faction_id
                    ));
                }
            }
            PerceptionEvent::HostileLost { observer, target } => {
                if let Ok((mut spotted, _)) = observers.get_mut(observer) {
                    if spotted.remove(target) {
                        crate::log(&format!("👻 HostileLost: {:?} lost sight of {:?}", observer, target));
                    }
                }
            }
            PerceptionEvent::TargetChanged { target: None, .. } => {}
        }
    }

    // Очищаем мёртвые/despawned entities из всех SpottedEnemies
    for (mut spotted, _) in observers.iter_mut() {
        let initial_count = spotted.enemies.len();
        spotted.enemies.retain(|&e| {
            potential_targets
                .get(e)
                .map(|h| h.is_alive())
                .unwrap_or(false)
        });

        let removed_count = initial_count - spotted.enemies.len();
        if removed_count > 0 {
            crate::log(&format!("AI: Removed {} dead/invalid targets from SpottedEnemies", removed_count));
        }
    }
}

/// Система: collaborator events → DecisionCore (request wake, target bookkeeping)
///
/// Та же фильтрация по фракциям, что и в update_spotted_enemies:
/// союзник не становится ни обнаруженным врагом, ни целью.
pub fn notify_decision_cores(
    mut cores: Query<&mut DecisionCore>,
    mut perception_events: EventReader<PerceptionEvent>,
    mut combat_events: EventReader<CombatStateChanged>,
    actors: Query<&Actor>,
) {
    for event in perception_events.read() {
        let observer = event.observer();
        let Ok(mut core) = cores.get_mut(observer) else {
            continue;
        };

        let hostile = |target: Entity| match (actors.get(observer), actors.get(target)) {
            (Ok(observer_actor), Ok(target_actor)) => observer_actor.is_hostile_to(target_actor),
            _ => false,
        };

        match *event {
            PerceptionEvent::HostileDetected { target, .. } => {
                if hostile(target) {
                    core.on_hostile_detected(target);
                }
            }
            PerceptionEvent::HostileLost { target, .. } => core.on_hostile_lost(target),
            PerceptionEvent::TargetChanged {
                target: Some(target),
                ..
            } => {
                if hostile(target) {
                    core.on_target_changed(Some(target));
                } else {
                    crate::log(&format!(
                        "AI: ignoring non-hostile target {:?} for {:?}",
                        target, observer
                    ));
                }
            }
            PerceptionEvent::TargetChanged { target: None, .. } => core.on_target_changed(None),
        }
    }

    for event in combat_events.read() {
        if let Ok(mut core) = cores.get_mut(event.agent) {
            core.on_combat_state_changed(event.in_combat);
        }
    }
}
