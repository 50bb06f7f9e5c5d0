//! AI компоненты: state machine, perception bookkeeping, scheduling

// NOTE: определены в crate::ai module, здесь только re-export для единообразия
pub use crate::ai::{
    AnimationFlags, DecisionCore, DecisionSchedule, Knockdown, SpottedEnemies,
};
