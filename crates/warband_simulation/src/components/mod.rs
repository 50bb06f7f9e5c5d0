//! ECS Components для агентов
//!
//! Организация по доменам:
//! - actor: базовые характеристики (faction, health)
//! - combat: combat intent и параметры атаки (CombatIntent, Attacker)
//! - movement: навигация и перемещение (MovementCommand, NavigationState, NavBounds)
//! - ai: искусственный интеллект (DecisionCore, SpottedEnemies, DecisionSchedule)

pub mod actor;
pub mod combat;
pub mod movement;
pub mod ai;

// Re-exports для удобного импорта
pub use actor::*;
pub use combat::*;
pub use movement::*;
pub use ai::*;
