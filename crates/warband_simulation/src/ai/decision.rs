//! DecisionCore - per-tick controller агента.
//!
//! Порядок правил в tick (первое сработавшее правило завершает tick):
//! 1. Bootstrapping: Idle + живая цель → Seeking
//! 2. Combat persistence: Combat + hostiles → только combat handler
//! 3. Target-distance override: ≤ combat_range → Combat, > combat_range → Seeking
//! 4. Per-state handler (Idle / Seeking / Moving / Combat)
//!
//! Hysteresis: вход в Combat при distance ≤ combat_range,
//! выход только при distance > engage_distance × disengage_multiplier.
//!
//! Никаких ошибок наружу: stale target → "нет цели", нет collaborator →
//! warning один раз + деградация.

use bevy::prelude::*;
use rand::{Rng, RngCore};
use crate::ai::config::{AIProfile, DecisionTiming, RangeConfig};
use crate::ai::events::BrainEvent;
use crate::ai::ports::{
    AgentDirectory, AnimationDriver, CombatExecutor, NavigationAgent, PerceptionService,
    RecoveryController,
};
use crate::ai::selector::{TargetCandidate, TargetSelector};
use crate::ai::state::{AIState, StateMachine, StateTransition};

/// Минимальный сдвиг destination для повторной команды (метры)
const DESTINATION_EPSILON: f32 = 0.1;

/// Collaborators одного tick (инжектятся владельцем, не ищутся в runtime)
pub struct DecisionContext<'a> {
    /// Позиция агента
    pub position: Vec3,
    pub faction_id: u64,
    pub perception: &'a dyn PerceptionService,
    pub directory: &'a dyn AgentDirectory,
    pub navigation: Option<&'a mut dyn NavigationAgent>,
    pub combat: Option<&'a mut dyn CombatExecutor>,
    pub recovery: Option<&'a dyn RecoveryController>,
    pub animation: Option<&'a mut dyn AnimationDriver>,
    pub rng: &'a mut dyn RngCore,
}

/// Цель, прошедшая liveness check в этом tick
#[derive(Debug, Clone, Copy)]
struct LiveTarget {
    entity: Entity,
    position: Vec3,
    distance: f32,
}

/// Мозг агента: state machine + цель + таймеры
#[derive(Component, Debug, Clone)]
pub struct DecisionCore {
    fsm: StateMachine,
    ranges: RangeConfig,
    timing: DecisionTiming,
    selector: TargetSelector,
    spawn_position: Vec3,
    target: Option<Entity>,
    idle_timer: f32,
    path_recalc_timer: f32,
    last_destination: Option<Vec3>,
    distance_to_target: f32,
    is_moving: bool,
    wake_requested: bool,
    warned_no_navigation: bool,
    warned_no_combat: bool,
    outbox: Vec<BrainEvent>,
}

impl DecisionCore {
    /// Создаёт core; порядок дистанций проверяется здесь (warnings в лог)
    pub fn new(profile: AIProfile, spawn_position: Vec3) -> Self {
        profile.ranges.validate_and_log();

        Self {
            fsm: StateMachine::new(AIState::Idle),
            ranges: profile.ranges,
            timing: profile.timing,
            selector: TargetSelector::new(profile.weights),
            spawn_position,
            target: None,
            idle_timer: 0.0,
            path_recalc_timer: 0.0,
            last_destination: None,
            distance_to_target: f32::INFINITY,
            is_moving: false,
            wake_requested: false,
            warned_no_navigation: false,
            warned_no_combat: false,
            outbox: Vec::new(),
        }
    }

    // --- Public surface ---

    pub fn current_state(&self) -> AIState {
        self.fsm.current()
    }

    pub fn previous_state(&self) -> AIState {
        self.fsm.previous()
    }

    pub fn current_target(&self) -> Option<Entity> {
        self.target
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Дистанция до цели на последнем tick (INFINITY если цели нет)
    pub fn distance_to_target(&self) -> f32 {
        self.distance_to_target
    }

    pub fn ranges(&self) -> &RangeConfig {
        &self.ranges
    }

    pub fn timing(&self) -> &DecisionTiming {
        &self.timing
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    pub fn idle_timer(&self) -> f32 {
        self.idle_timer
    }

    /// Событие требует внеочередного tick
    pub fn wake_requested(&self) -> bool {
        self.wake_requested
    }

    pub fn request_wake(&mut self) {
        self.wake_requested = true;
    }

    /// Забирает накопленные события (StateChanged, TargetFound, ...)
    pub fn drain_events(&mut self) -> Vec<BrainEvent> {
        std::mem::take(&mut self.outbox)
    }

    // --- Collaborator events ---

    /// Perception сменил цель (None = потерял)
    pub fn on_target_changed(&mut self, new_target: Option<Entity>) {
        if new_target != self.target {
            self.set_target(new_target);
        }
        self.wake_requested = true;
    }

    pub fn on_hostile_detected(&mut self, _hostile: Entity) {
        self.wake_requested = true;
    }

    pub fn on_hostile_lost(&mut self, hostile: Entity) {
        if self.target == Some(hostile) {
            self.set_target(None);
        }
        self.wake_requested = true;
    }

    pub fn on_combat_state_changed(&mut self, _in_combat: bool) {
        self.wake_requested = true;
    }

    /// Recovery после knockdown: безусловный reset в Idle (в обход таблицы)
    ///
    /// Путь, начатый до падения, больше не актуален - сбрасываем.
    pub fn on_recovery_completed(&mut self, ctx: &mut DecisionContext<'_>) {
        self.stop_combat(ctx);
        self.stop_moving(ctx);

        if let Some(transition) = self.fsm.force_change_state(AIState::Idle) {
            self.record_transition(transition);
        }
        self.idle_timer = 0.0;

        crate::log_info(&format!(
            "🩹 AI: recovery completed → forced Idle (was {})",
            self.fsm.previous().as_str()
        ));
    }

    // --- Decision tick ---

    /// Один decision tick. `dt` - время с прошлого tick этого агента.
    pub fn tick(&mut self, ctx: &mut DecisionContext<'_>, dt: f32) {
        self.wake_requested = false;
        self.warn_missing_collaborators(ctx);

        if ctx.recovery.is_some_and(|r| r.is_recovery_active()) {
            // Knockdown: решения ждут RecoveryCompleted
            return;
        }

        if self.fsm.current() == AIState::Idle {
            self.idle_timer += dt;
        }
        self.path_recalc_timer += dt;

        self.decide(ctx);
        self.refresh_observations(ctx);
    }

    fn decide(&mut self, ctx: &mut DecisionContext<'_>) {
        let hostiles = ctx.perception.has_hostiles();
        let target = self.live_target(ctx);
        let state = self.fsm.current();

        // 1. Bootstrapping fix-up
        if state == AIState::Idle && target.is_some() {
            self.transition(AIState::Seeking);
            return;
        }

        // 2. Combat persistence
        if state == AIState::Combat && hostiles {
            self.handle_combat(ctx, hostiles);
            return;
        }

        // 3. Target-distance override
        if let (Some(target), true) = (target, hostiles) {
            if target.distance <= self.ranges.combat_range && state != AIState::Combat {
                self.transition(AIState::Combat);
                self.start_combat(ctx, target.entity);
                return;
            }
            if target.distance > self.ranges.combat_range
                && !matches!(state, AIState::Seeking | AIState::Combat)
            {
                self.transition(AIState::Seeking);
                return;
            }
        }

        // 4. Per-state handler
        match state {
            AIState::Idle => self.handle_idle(ctx, hostiles),
            AIState::Seeking => self.handle_seeking(ctx),
            AIState::Moving => self.handle_moving(ctx, hostiles),
            AIState::Combat => self.handle_combat(ctx, hostiles),
        }
    }

    fn handle_idle(&mut self, ctx: &mut DecisionContext<'_>, hostiles: bool) {
        // Мёртвая или не вражеская цель в Idle - просто забываем
        if self.target.is_some_and(|t| self.resolve_live(ctx, t).is_none()) {
            self.set_target(None);
        }

        if hostiles {
            self.transition(AIState::Seeking);
            return;
        }

        if self.idle_timer < self.timing.idle_time {
            return;
        }

        let moved = match self.sample_patrol_point(ctx) {
            Some(point) => self.issue_move(ctx, point),
            None => false,
        };

        if moved {
            self.transition(AIState::Moving);
        } else {
            // Неудачный sample - ждём следующий idle цикл
            self.idle_timer = 0.0;
        }
    }

    fn handle_seeking(&mut self, ctx: &mut DecisionContext<'_>) {
        match self.target {
            Some(held) => {
                // Сначала liveness удержанной цели, потом switching policy
                if self.resolve_live(ctx, held).is_none() {
                    crate::log(&format!("❌ AI Seeking: target {:?} dead or gone", held));
                    self.set_target(None);
                    self.transition(AIState::Idle);
                    return;
                }
                self.retarget(ctx, held);
            }
            None => {
                if self.acquire_target(ctx).is_none() {
                    self.transition(AIState::Idle);
                    return;
                }
            }
        }

        let Some(target) = self.live_target(ctx) else {
            self.set_target(None);
            self.transition(AIState::Idle);
            return;
        };

        if target.distance > self.ranges.combat_range {
            self.move_towards(ctx, target.position);
        } else {
            self.stop_moving(ctx);
            self.start_combat(ctx, target.entity);
            self.transition(AIState::Combat);
        }
    }

    fn handle_moving(&mut self, ctx: &mut DecisionContext<'_>, hostiles: bool) {
        if self.path_recalc_timer >= self.timing.path_recalc_interval {
            self.path_recalc_timer = 0.0;

            if let Some(target) = self.live_target(ctx) {
                let drift = self
                    .last_destination
                    .map_or(f32::INFINITY, |dest| dest.distance(target.position));
                if drift > 2.0 * self.ranges.stopping_distance {
                    self.issue_move(ctx, target.position);
                }
            }
        }

        if self.destination_reached(ctx) {
            self.last_destination = None;
            self.outbox.push(BrainEvent::DestinationReached);
            if hostiles {
                self.transition(AIState::Seeking);
            } else {
                self.transition(AIState::Idle);
            }
        }
    }

    fn handle_combat(&mut self, ctx: &mut DecisionContext<'_>, hostiles: bool) {
        if !hostiles {
            self.stop_combat(ctx);
            self.transition(AIState::Idle);
            return;
        }

        let held = self.target.and_then(|t| self.resolve_live(ctx, t));
        let target = match held {
            Some(target) => target,
            None => {
                if let Some(lost) = self.target {
                    crate::log(&format!("❌ AI Combat: target {:?} dead or gone", lost));
                    self.set_target(None);
                }

                let reacquired = self
                    .acquire_target(ctx)
                    .and_then(|entity| self.resolve_live(ctx, entity));
                match reacquired {
                    Some(next) => {
                        crate::log(&format!("🔄 AI Combat: switching to {:?}", next.entity));
                        self.start_combat(ctx, next.entity);
                    }
                    None => {
                        self.stop_combat(ctx);
                        self.transition(AIState::Seeking);
                    }
                }
                return;
            }
        };

        if target.distance > self.ranges.disengage_distance() {
            crate::log(&format!(
                "🏃 AI Combat: disengage from {:?} ({:.1}m > {:.1}m)",
                target.entity,
                target.distance,
                self.ranges.disengage_distance()
            ));
            self.stop_combat(ctx);
            self.transition(AIState::Seeking);
            return;
        }

        // Idempotent: start только если executor не в бою.
        // Сближение до reach - забота executor, движения отсюда не выдаём.
        let in_combat = ctx.combat.as_deref().is_some_and(|c| c.is_in_combat());
        if !in_combat {
            self.start_combat(ctx, target.entity);
        }
    }

    // --- Targets ---

    fn live_target(&self, ctx: &DecisionContext<'_>) -> Option<LiveTarget> {
        self.target.and_then(|t| self.resolve_live(ctx, t))
    }

    fn resolve_live(&self, ctx: &DecisionContext<'_>, entity: Entity) -> Option<LiveTarget> {
        let snapshot = ctx.directory.snapshot(entity)?;
        // Союзник целью быть не может
        if !snapshot.alive || snapshot.faction_id == ctx.faction_id {
            return None;
        }
        Some(LiveTarget {
            entity,
            position: snapshot.position,
            distance: ctx.position.distance(snapshot.position),
        })
    }

    fn candidates(&self, ctx: &DecisionContext<'_>) -> Vec<TargetCandidate> {
        ctx.perception
            .detected_hostiles()
            .into_iter()
            .filter_map(|entity| {
                let snapshot = ctx.directory.snapshot(entity)?;
                (snapshot.alive && snapshot.faction_id != ctx.faction_id).then_some(TargetCandidate {
                    entity,
                    position: snapshot.position,
                    health_fraction: snapshot.health_fraction,
                    alive: snapshot.alive,
                })
            })
            .collect()
    }

    fn acquire_target(&mut self, ctx: &DecisionContext<'_>) -> Option<Entity> {
        let candidates = self.candidates(ctx);
        let choice = self
            .selector
            .select(ctx.position, self.ranges.seek_radius, &candidates, self.target)?;

        if self.target != Some(choice.entity) {
            self.set_target(Some(choice.entity));
        }
        Some(choice.entity)
    }

    /// Re-scoring с удержанной целью: switching policy решает, менять ли
    fn retarget(&mut self, ctx: &DecisionContext<'_>, held: Entity) {
        let candidates = self.candidates(ctx);
        if candidates.is_empty() {
            return;
        }

        let choice = self
            .selector
            .select(ctx.position, self.ranges.seek_radius, &candidates, Some(held));
        if let Some(choice) = choice {
            if choice.entity != held {
                crate::log(&format!(
                    "🎯 AI: retarget {:?} → {:?} (score {:.2})",
                    held, choice.entity, choice.score
                ));
                self.set_target(Some(choice.entity));
            }
        }
    }

    fn set_target(&mut self, next: Option<Entity>) {
        if let Some(previous) = self.target.take() {
            self.outbox.push(BrainEvent::TargetLost(previous));
        }
        if let Some(next) = next {
            self.outbox.push(BrainEvent::TargetFound(next));
        }
        self.target = next;
    }

    // --- Navigation ---

    fn sample_patrol_point(&mut self, ctx: &mut DecisionContext<'_>) -> Option<Vec3> {
        let radius = self.ranges.patrol_radius;
        let angle = ctx.rng.gen::<f32>() * std::f32::consts::TAU;
        let distance = radius * ctx.rng.gen::<f32>().sqrt();
        let candidate =
            self.spawn_position + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);

        ctx.navigation
            .as_deref()
            .and_then(|nav| nav.sample_position(candidate, radius))
    }

    fn issue_move(&mut self, ctx: &mut DecisionContext<'_>, position: Vec3) -> bool {
        let Some(nav) = ctx.navigation.as_deref_mut() else {
            return false;
        };
        if !nav.is_on_navigable_surface() {
            return false;
        }

        nav.set_destination(position);
        self.last_destination = Some(position);
        self.path_recalc_timer = 0.0;
        self.outbox.push(BrainEvent::DestinationSet(position));
        true
    }

    /// Команда движения только если цель заметно сместилась
    fn move_towards(&mut self, ctx: &mut DecisionContext<'_>, position: Vec3) {
        let stale = self
            .last_destination
            .map_or(true, |dest| dest.distance(position) > DESTINATION_EPSILON);
        if stale {
            self.issue_move(ctx, position);
        }
    }

    fn stop_moving(&mut self, ctx: &mut DecisionContext<'_>) {
        if let Some(nav) = ctx.navigation.as_deref_mut() {
            nav.clear_path();
        }
        self.last_destination = None;
    }

    fn destination_reached(&self, ctx: &DecisionContext<'_>) -> bool {
        let Some(nav) = ctx.navigation.as_deref() else {
            return true;
        };
        !nav.path_pending()
            && nav.remaining_distance() <= self.timing.arrival_threshold
            && (!nav.has_path() || nav.velocity().length() <= self.timing.stopped_speed)
    }

    // --- Combat ---

    fn start_combat(&mut self, ctx: &mut DecisionContext<'_>, target: Entity) {
        if let Some(combat) = ctx.combat.as_deref_mut() {
            combat.start_combat(target);
        }
    }

    fn stop_combat(&mut self, ctx: &mut DecisionContext<'_>) {
        if let Some(combat) = ctx.combat.as_deref_mut() {
            if combat.is_in_combat() {
                combat.stop_combat();
            }
        }
    }

    // --- Bookkeeping ---

    fn transition(&mut self, next: AIState) {
        if let Some(transition) = self.fsm.change_state(next) {
            self.record_transition(transition);
        }
    }

    fn record_transition(&mut self, transition: StateTransition) {
        if transition.next == AIState::Idle {
            self.idle_timer = 0.0;
        }
        crate::log(&format!(
            "AI: {} → {}{}",
            transition.previous.as_str(),
            transition.next.as_str(),
            if transition.forced { " (forced)" } else { "" }
        ));
        self.outbox.push(BrainEvent::StateChanged(transition));
    }

    fn refresh_observations(&mut self, ctx: &mut DecisionContext<'_>) {
        self.distance_to_target = self
            .live_target(ctx)
            .map_or(f32::INFINITY, |target| target.distance);

        let speed = ctx
            .navigation
            .as_deref()
            .map_or(0.0, |nav| nav.velocity().length());
        self.is_moving = speed > self.timing.stopped_speed;

        let state = self.fsm.current();
        if let Some(animation) = ctx.animation.as_deref_mut() {
            animation.drive(speed, self.is_moving, state);
        }
    }

    fn warn_missing_collaborators(&mut self, ctx: &DecisionContext<'_>) {
        if ctx.navigation.is_none() && !self.warned_no_navigation {
            self.warned_no_navigation = true;
            crate::log_warning("⚠️ AI: no navigation agent - patrol and pursuit disabled");
        }
        if ctx.combat.is_none() && !self.warned_no_combat {
            self.warned_no_combat = true;
            crate::log_warning("⚠️ AI: no combat executor - Combat state without attacks");
        }
    }
}
