//! AI systems (ECS integration of DecisionCore)

pub mod decision;
pub mod lifecycle;
pub mod perception;

// Re-export all systems
pub use decision::*;
pub use lifecycle::*;
pub use perception::*;
