//! AI state machine: текущее/предыдущее состояние + таблица переходов.
//!
//! Таблица разрешённых переходов (normal flow):
//! - Idle    → Seeking, Moving
//! - Seeking → Moving, Combat, Idle
//! - Moving  → Combat, Seeking, Idle
//! - Combat  → Seeking, Idle
//!
//! `change_state` НЕ блокирует переходы вне таблицы (только warning в лог) -
//! DecisionCore единственный writer и обязан её соблюдать.
//! `force_change_state` - только для recovery (knockdown → Idle).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// AI FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum AIState {
    /// Idle - стоим, ждём врага или таймер патруля
    #[default]
    Idle,

    /// Seeking - есть враги, ищем/преследуем цель
    Seeking,

    /// Moving - патруль или общее перемещение к точке
    Moving,

    /// Combat - бой с целью (выход только через disengage hysteresis)
    Combat,
}

impl AIState {
    pub const ALL: [AIState; 4] = [AIState::Idle, AIState::Seeking, AIState::Moving, AIState::Combat];

    /// Разрешён ли переход `self → next` в normal flow
    pub fn can_transition(self, next: AIState) -> bool {
        use AIState::*;
        matches!(
            (self, next),
            (Idle, Seeking)
                | (Idle, Moving)
                | (Seeking, Moving)
                | (Seeking, Combat)
                | (Seeking, Idle)
                | (Moving, Combat)
                | (Moving, Seeking)
                | (Moving, Idle)
                | (Combat, Seeking)
                | (Combat, Idle)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AIState::Idle => "Idle",
            AIState::Seeking => "Seeking",
            AIState::Moving => "Moving",
            AIState::Combat => "Combat",
        }
    }
}

/// Факт перехода (payload для AIEvent::StateChanged)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub previous: AIState,
    pub next: AIState,
    /// true если переход через force_change_state (recovery)
    pub forced: bool,
}

/// State machine агента
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct StateMachine {
    current: AIState,
    previous: AIState,
}

impl StateMachine {
    pub fn new(initial: AIState) -> Self {
        Self {
            current: initial,
            previous: initial,
        }
    }

    pub fn current(&self) -> AIState {
        self.current
    }

    pub fn previous(&self) -> AIState {
        self.previous
    }

    /// Normal переход. No-op (None) если `next == current`.
    ///
    /// Переход вне таблицы выполняется, но логируется как warning.
    pub fn change_state(&mut self, next: AIState) -> Option<StateTransition> {
        if next == self.current {
            return None;
        }

        if !self.current.can_transition(next) {
            crate::log_warning(&format!(
                "⚠️ FSM: transition {} → {} is not in the transition table",
                self.current.as_str(),
                next.as_str()
            ));
        }

        Some(self.apply(next, false))
    }

    /// Recovery переход: без проверки таблицы.
    pub fn force_change_state(&mut self, next: AIState) -> Option<StateTransition> {
        if next == self.current {
            return None;
        }
        Some(self.apply(next, true))
    }

    fn apply(&mut self, next: AIState, forced: bool) -> StateTransition {
        self.previous = self.current;
        self.current = next;
        StateTransition {
            previous: self.previous,
            next,
            forced,
        }
    }
}
