//! AI components агента: spotted enemies, decision schedule, knockdown, animation sink.

use bevy::prelude::*;
use crate::ai::ports::AnimationDriver;
use crate::ai::state::AIState;

/// Component: обнаруженные враги (от PerceptionEvent)
///
/// Обновляется через HostileDetected/HostileLost events.
/// Порядок = порядок обнаружения (TargetSelector ломает ничьи по нему).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SpottedEnemies {
    pub enemies: Vec<Entity>,
}

impl SpottedEnemies {
    /// Добавляет если ещё нет. true если добавили.
    pub fn insert(&mut self, enemy: Entity) -> bool {
        if self.enemies.contains(&enemy) {
            return false;
        }
        self.enemies.push(enemy);
        true
    }

    /// true если был в списке
    pub fn remove(&mut self, enemy: Entity) -> bool {
        let before = self.enemies.len();
        self.enemies.retain(|&e| e != enemy);
        before != self.enemies.len()
    }

    pub fn contains(&self, enemy: Entity) -> bool {
        self.enemies.contains(&enemy)
    }
}

/// Component: расписание decision ticks агента
///
/// Decision tick идёт с фиксированным интервалом (грубее FixedUpdate),
/// либо внеочередно если DecisionCore запросил wake.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DecisionSchedule {
    /// Интервал между tick (секунды)
    pub interval: f32,
    /// Накопленное время с прошлого tick
    pub accumulated: f32,
}

impl DecisionSchedule {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulated: 0.0,
        }
    }

    /// Стартовая фаза в [0, 1): агенты одного спавна не тикают синхронно
    pub fn with_phase(interval: f32, phase: f32) -> Self {
        Self {
            interval,
            accumulated: interval * phase.clamp(0.0, 1.0),
        }
    }

    /// Добавляет время; true если интервал истёк
    pub fn advance(&mut self, delta: f32) -> bool {
        self.accumulated += delta;
        self.accumulated >= self.interval
    }

    /// Забирает накопленное время (dt для DecisionCore::tick)
    pub fn take_elapsed(&mut self) -> f32 {
        std::mem::take(&mut self.accumulated)
    }
}

/// Component: агент сбит с ног (one-shot таймер)
///
/// Пока компонент есть - decision ticks пропускаются.
/// По истечении удаляется и пишется RecoveryCompleted.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Knockdown {
    pub remaining: f32,
}

impl Knockdown {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
        }
    }
}

/// Component: флаги для animation layer (sink, AI их не читает)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct AnimationFlags {
    pub speed: f32,
    pub is_moving: bool,
    pub state: AIState,
}

impl AnimationDriver for AnimationFlags {
    fn drive(&mut self, speed: f32, is_moving: bool, state: AIState) {
        self.speed = speed;
        self.is_moving = is_moving;
        self.state = state;
    }
}

/// Компонент-маркер: агент мертв, AI отключен
#[derive(Component, Debug)]
pub struct Dead;
