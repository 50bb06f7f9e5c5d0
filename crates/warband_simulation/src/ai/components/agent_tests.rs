//! Tests for AI agent components.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use super::super::agent::{AnimationFlags, DecisionSchedule, SpottedEnemies};
    use crate::ai::ports::AnimationDriver;
    use crate::ai::AIState;

    #[test]
    fn test_spotted_enemies_no_duplicates() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut spotted = SpottedEnemies::default();
        assert!(spotted.insert(a));
        assert!(spotted.insert(b));
        assert!(!spotted.insert(a));
        assert_eq!(spotted.enemies, vec![a, b]);

        assert!(spotted.remove(a));
        assert!(!spotted.remove(a));
        assert!(!spotted.contains(a));
        assert!(spotted.contains(b));
    }

    #[test]
    fn test_decision_schedule_interval() {
        let mut schedule = DecisionSchedule::new(0.1);

        assert!(!schedule.advance(0.05));
        assert!(schedule.advance(0.05));

        let elapsed = schedule.take_elapsed();
        assert!((elapsed - 0.1).abs() < 1e-6);
        assert_eq!(schedule.accumulated, 0.0);
    }

    #[test]
    fn test_decision_schedule_phase_staggers_first_tick() {
        let mut early = DecisionSchedule::with_phase(0.1, 0.9);
        let mut late = DecisionSchedule::with_phase(0.1, 0.0);

        assert!(early.advance(0.02));
        assert!(!late.advance(0.02));
    }

    #[test]
    fn test_animation_flags_sink() {
        let mut flags = AnimationFlags::default();
        flags.drive(2.5, true, AIState::Seeking);

        assert_eq!(flags.speed, 2.5);
        assert!(flags.is_moving);
        assert_eq!(flags.state, AIState::Seeking);
    }
}
