//! AI components

pub mod agent;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod agent_tests;

// Re-export all components
pub use agent::*;
