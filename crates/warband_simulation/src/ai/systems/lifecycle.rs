//! Lifecycle systems: knockdown recovery timer, death teardown.

use bevy::prelude::*;
use crate::ai::components::{Dead, Knockdown};
use crate::ai::events::RecoveryCompleted;
use crate::components::{CombatIntent, Health, MovementCommand};

/// System: one-shot knockdown таймер
///
/// remaining → 0: снимаем Knockdown, пишем RecoveryCompleted
/// (DecisionCore форсирует Idle в run_decision_ticks).
pub fn tick_knockdown_timers(
    mut commands: Commands,
    mut knocked: Query<(Entity, &mut Knockdown)>,
    mut recovered: EventWriter<RecoveryCompleted>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut knockdown) in knocked.iter_mut() {
        knockdown.remaining -= delta;
        if knockdown.remaining > 0.0 {
            continue;
        }

        commands.entity(entity).remove::<Knockdown>();
        recovered.write(RecoveryCompleted { agent: entity });
        crate::log(&format!("🧍 {:?} recovered from knockdown", entity));
    }
}

/// System: смерть → teardown AI
///
/// Останавливаем навигацию и бой, вешаем Dead - decision ticks больше не идут.
pub fn handle_agent_death(
    mut commands: Commands,
    mut agents: Query<
        (Entity, &Health, Option<&mut MovementCommand>, Option<&mut CombatIntent>),
        (Changed<Health>, Without<Dead>),
    >,
) {
    for (entity, health, command, intent) in agents.iter_mut() {
        if health.is_alive() {
            continue;
        }

        if let Some(mut command) = command {
            *command = MovementCommand::Stop;
        }
        if let Some(mut intent) = intent {
            intent.disengage();
        }

        commands.entity(entity).insert(Dead);
        crate::log_info(&format!("💀 {:?} died → AI disabled", entity));
    }
}
