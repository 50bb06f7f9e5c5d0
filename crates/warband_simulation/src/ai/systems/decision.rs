//! Decision tick scheduler: собирает collaborators агента и вызывает DecisionCore.

use bevy::prelude::*;
use std::collections::HashSet;
use crate::ai::adapters::{
    AgentQuery, EcsCombat, EcsDirectory, EcsNavigation, EcsPerception, KnockdownRecovery,
};
use crate::ai::components::{AnimationFlags, DecisionSchedule, Dead, Knockdown, SpottedEnemies};
use crate::ai::decision::{DecisionContext, DecisionCore};
use crate::ai::events::{AIEvent, RecoveryCompleted};
use crate::ai::ports::{AnimationDriver, CombatExecutor, NavigationAgent};
use crate::components::{Actor, CombatIntent, Health, MovementCommand, NavBounds, NavigationState};
use crate::DeterministicRng;

/// Query агентов с AI (collaborators - optional компоненты)
type BrainQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut DecisionCore,
        &'static mut DecisionSchedule,
        &'static Transform,
        &'static Actor,
        &'static Health,
        &'static SpottedEnemies,
        Option<&'static mut MovementCommand>,
        Option<&'static mut NavigationState>,
        Option<&'static mut CombatIntent>,
        Option<&'static Knockdown>,
        Option<&'static mut AnimationFlags>,
    ),
    Without<Dead>,
>;

/// Система: decision ticks (fixed interval + внеочередные wake)
///
/// Каждый агент тикает независимо; один tick = одно сработавшее правило.
/// RecoveryCompleted обрабатывается здесь же - recovery нужны collaborators.
pub fn run_decision_ticks(
    mut brains: BrainQuery,
    agents: AgentQuery,
    nav_bounds: Option<Res<NavBounds>>,
    mut recovery_events: EventReader<RecoveryCompleted>,
    mut rng: ResMut<DeterministicRng>,
    mut ai_events: EventWriter<AIEvent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let recovered: HashSet<Entity> = recovery_events.read().map(|e| e.agent).collect();
    let directory = EcsDirectory { agents: &agents };
    let bounds = nav_bounds.as_deref();

    for (
        entity,
        mut core,
        mut schedule,
        transform,
        actor,
        health,
        spotted,
        command,
        nav_state,
        intent,
        knockdown,
        mut animation,
    ) in brains.iter_mut()
    {
        if !health.is_alive() {
            continue;
        }

        let due = schedule.advance(delta);
        let just_recovered = recovered.contains(&entity);
        if !due && !core.wake_requested() && !just_recovered {
            continue;
        }
        let elapsed = schedule.take_elapsed();

        let perception = EcsPerception {
            spotted,
            directory: &directory,
        };
        let mut navigation = match (command, nav_state) {
            (Some(command), Some(state)) => Some(EcsNavigation {
                command: command.into_inner(),
                state: state.into_inner(),
                bounds,
            }),
            _ => None,
        };
        let mut combat = intent.map(|intent| EcsCombat {
            intent: intent.into_inner(),
        });
        let recovery = KnockdownRecovery {
            active: knockdown.is_some(),
        };

        let mut ctx = DecisionContext {
            position: transform.translation,
            faction_id: actor.faction_id,
            perception: &perception,
            directory: &directory,
            navigation: navigation.as_mut().map(|n| n as &mut dyn NavigationAgent),
            combat: combat.as_mut().map(|c| c as &mut dyn CombatExecutor),
            recovery: Some(&recovery),
            animation: animation.as_deref_mut().map(|a| a as &mut dyn AnimationDriver),
            rng: &mut rng.rng,
        };

        if just_recovered {
            core.on_recovery_completed(&mut ctx);
        }
        core.tick(&mut ctx, elapsed);

        for event in core.drain_events() {
            ai_events.write(AIEvent {
                agent: entity,
                event,
            });
        }
    }
}
