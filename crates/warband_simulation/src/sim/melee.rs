//! Melee executor - headless замена combat layer.
//!
//! CombatIntent.engaged + цель вне reach → executor сам подходит к ней.
//! CombatIntent.engaged + цель в reach + cooldown готов → MeleeHit.
//! MeleeHit → урон → DamageDealt / EntityDied. Смерть цели выключает
//! intent у всех атакующих её и пишет CombatStateChanged.

use bevy::prelude::*;
use crate::ai::{CombatStateChanged, Dead, Knockdown};
use crate::components::{Attacker, CombatIntent, Health, MovementCommand};

/// Сдвиг цели, после которого команда сближения обновляется (метры)
const CHASE_EPSILON: f32 = 0.1;

/// Удар долетел до цели (execution → damage)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MeleeHit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    /// Knockdown цели (секунды), если атакующий умеет сбивать с ног
    pub knockdown: Option<f32>,
}

/// Урон нанесён
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub remaining_health: u32,
}

/// Entity умерла (health дошло до 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// System: обновление cooldown таймеров
pub fn tick_attack_cooldowns(mut attackers: Query<&mut Attacker>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut attacker in attackers.iter_mut() {
        attacker.tick_cooldown(delta);
    }
}

/// System: engaged атакующий вне reach идёт к своей цели
///
/// DecisionCore в Combat движения не выдаёт; сближение до дистанции удара
/// выполняет executor через тот же MovementCommand.
pub fn close_to_reach(
    mut attackers: Query<
        (&Transform, &Attacker, &CombatIntent, &mut MovementCommand),
        (Without<Dead>, Without<Knockdown>),
    >,
    targets: Query<(&Transform, &Health)>,
) {
    for (transform, attacker, intent, mut command) in attackers.iter_mut() {
        if !intent.engaged {
            continue;
        }
        let Some(target) = intent.target else {
            continue;
        };
        let Ok((target_transform, health)) = targets.get(target) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let goal = target_transform.translation;
        if transform.translation.distance(goal) <= attacker.reach {
            continue;
        }

        let stale = match *command {
            MovementCommand::MoveToPosition { target } => target.distance(goal) > CHASE_EPSILON,
            _ => true,
        };
        if stale {
            *command = MovementCommand::MoveToPosition { target: goal };
        }
    }
}

/// System: engaged атакующие бьют цель в пределах reach
pub fn melee_attack_execution(
    mut attackers: Query<
        (Entity, &Transform, &mut Attacker, &CombatIntent),
        (Without<Dead>, Without<Knockdown>),
    >,
    targets: Query<(&Transform, &Health)>,
    mut hits: EventWriter<MeleeHit>,
) {
    for (entity, transform, mut attacker, intent) in attackers.iter_mut() {
        if !intent.engaged || !attacker.can_attack() {
            continue;
        }
        let Some(target) = intent.target else {
            continue;
        };
        if target == entity {
            continue;
        }
        let Ok((target_transform, health)) = targets.get(target) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let distance = transform.translation.distance(target_transform.translation);
        if distance > attacker.reach {
            continue;
        }

        attacker.start_attack();
        hits.write(MeleeHit {
            attacker: entity,
            target,
            damage: attacker.base_damage,
            knockdown: (attacker.knockdown_duration > 0.0).then_some(attacker.knockdown_duration),
        });
    }
}

/// System: MeleeHit → Health
///
/// Мёртвую цель не добиваем. На смерти: EntityDied + disengage всех,
/// кто её атаковал (executor сообщает CombatStateChanged).
pub fn apply_melee_damage(
    mut commands: Commands,
    mut hits: EventReader<MeleeHit>,
    mut healths: Query<&mut Health>,
    mut intents: Query<(Entity, &mut CombatIntent)>,
    mut damage_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
    mut combat_events: EventWriter<CombatStateChanged>,
) {
    for hit in hits.read() {
        let Ok(mut health) = healths.get_mut(hit.target) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        health.take_damage(hit.damage);
        damage_events.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            damage: hit.damage,
            remaining_health: health.current,
        });
        crate::log(&format!(
            "💥 {:?} hit {:?} for {} (HP: {})",
            hit.attacker, hit.target, hit.damage, health.current
        ));

        if health.is_alive() {
            if let Some(duration) = hit.knockdown {
                commands.entity(hit.target).insert(Knockdown::new(duration));
                crate::log(&format!("🤸 {:?} knocked down for {:.1}s", hit.target, duration));
            }
            continue;
        }

        died_events.write(EntityDied {
            entity: hit.target,
            killer: Some(hit.attacker),
        });
        crate::log_info(&format!("☠️ {:?} killed by {:?}", hit.target, hit.attacker));

        for (agent, mut intent) in intents.iter_mut() {
            if intent.engaged && intent.target == Some(hit.target) {
                intent.disengage();
                combat_events.write(CombatStateChanged {
                    agent,
                    in_combat: false,
                });
            }
        }
    }
}
