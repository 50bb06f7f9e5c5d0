//! Tests for target scoring and the switching policy.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use proptest::prelude::*;
    use crate::ai::config::ScoreWeights;
    use crate::ai::selector::{TargetCandidate, TargetSelector};

    const SEEK: f32 = 15.0;

    fn entities(count: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..count).map(|_| world.spawn_empty().id()).collect()
    }

    fn candidate(entity: Entity, distance: f32, health_fraction: f32) -> TargetCandidate {
        TargetCandidate {
            entity,
            position: Vec3::new(distance, 0.0, 0.0),
            health_fraction,
            alive: true,
        }
    }

    #[test]
    fn test_score_formula() {
        let e = entities(1);
        let selector = TargetSelector::default();

        // 0.5 × (1 − 7.5/15) + 0.3 × (1 − 0.5) = 0.25 + 0.15
        let score = selector.score(&candidate(e[0], 7.5, 0.5), Vec3::ZERO, SEEK, None);
        assert!((score - 0.4).abs() < 1e-5);

        let with_bonus = selector.score(&candidate(e[0], 7.5, 0.5), Vec3::ZERO, SEEK, Some(e[0]));
        assert!((with_bonus - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_distance_beyond_seek_radius_scores_zero() {
        let e = entities(1);
        let selector = TargetSelector::default();

        let score = selector.score(&candidate(e[0], 40.0, 1.0), Vec3::ZERO, SEEK, None);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_prefers_closer_and_wounded() {
        let e = entities(3);
        let selector = TargetSelector::default();

        let candidates = [
            candidate(e[0], 12.0, 1.0),
            candidate(e[1], 4.0, 1.0),
            candidate(e[2], 12.0, 0.5),
        ];
        let best = selector.select(Vec3::ZERO, SEEK, &candidates, None).unwrap();
        assert_eq!(best.entity, e[1]);
        assert!((best.distance - 4.0).abs() < 1e-5);

        // Раненый выигрывает у здорового на той же дистанции
        let best = selector
            .select(Vec3::ZERO, SEEK, &[candidates[0], candidates[2]], None)
            .unwrap();
        assert_eq!(best.entity, e[2]);
    }

    #[test]
    fn test_dead_candidates_skipped() {
        let e = entities(2);
        let selector = TargetSelector::default();

        let mut dead = candidate(e[0], 1.0, 0.0);
        dead.alive = false;

        assert!(selector.select(Vec3::ZERO, SEEK, &[dead], None).is_none());

        let best = selector
            .select(Vec3::ZERO, SEEK, &[dead, candidate(e[1], 10.0, 1.0)], None)
            .unwrap();
        assert_eq!(best.entity, e[1]);
    }

    #[test]
    fn test_empty_candidates() {
        let selector = TargetSelector::default();
        assert!(selector.select(Vec3::ZERO, SEEK, &[], None).is_none());
    }

    #[test]
    fn test_tie_goes_to_earlier_candidate() {
        let e = entities(2);
        let selector = TargetSelector::default();

        let candidates = [candidate(e[0], 5.0, 1.0), candidate(e[1], 5.0, 1.0)];
        let best = selector.select(Vec3::ZERO, SEEK, &candidates, None).unwrap();
        assert_eq!(best.entity, e[0]);
    }

    #[test]
    fn test_held_target_kept_within_margin() {
        let e = entities(2);
        let selector = TargetSelector::default();

        // held: 0.5 × (1 − 10/15) + 0.3 = 0.4667
        // other: 0.5 × (1 − 4/15) = 0.3667, без bonus проигрывает
        let candidates = [candidate(e[0], 10.0, 1.0), candidate(e[1], 4.0, 1.0)];
        let best = selector
            .select(Vec3::ZERO, SEEK, &candidates, Some(e[0]))
            .unwrap();
        assert_eq!(best.entity, e[0]);
    }

    #[test]
    fn test_switch_when_clearly_better() {
        let e = entities(2);
        let selector = TargetSelector::default();

        // held: 0.4667; other: 0.5 × (1 − 1.5/15) + 0.3 × 0.9 = 0.72 > 0.6667
        let candidates = [candidate(e[0], 10.0, 1.0), candidate(e[1], 1.5, 0.1)];
        let best = selector
            .select(Vec3::ZERO, SEEK, &candidates, Some(e[0]))
            .unwrap();
        assert_eq!(best.entity, e[1]);
    }

    #[test]
    fn test_missing_incumbent_falls_back_to_best() {
        let e = entities(3);
        let selector = TargetSelector::default();

        // e[2] удерживался, но больше не кандидат
        let candidates = [candidate(e[0], 10.0, 1.0), candidate(e[1], 3.0, 1.0)];
        let best = selector
            .select(Vec3::ZERO, SEEK, &candidates, Some(e[2]))
            .unwrap();
        assert_eq!(best.entity, e[1]);
    }

    #[test]
    fn test_custom_weights() {
        let e = entities(2);
        let selector = TargetSelector::new(ScoreWeights {
            distance: 0.0,
            health: 1.0,
            stability_bonus: 0.0,
            switch_margin: 0.0,
        });

        let candidates = [candidate(e[0], 1.0, 0.9), candidate(e[1], 14.0, 0.2)];
        let best = selector.select(Vec3::ZERO, SEEK, &candidates, None).unwrap();
        assert_eq!(best.entity, e[1]);
    }

    proptest! {
        /// Одинаковые входы → одинаковый выбор
        #[test]
        fn prop_selection_is_deterministic(
            targets in prop::collection::vec((0.0f32..30.0, 0.0f32..=1.0, any::<bool>()), 0..8),
            held in prop::option::of(0usize..8),
        ) {
            let e = entities(8);
            let candidates: Vec<_> = targets
                .iter()
                .enumerate()
                .map(|(i, &(distance, health, alive))| TargetCandidate {
                    alive,
                    ..candidate(e[i], distance, health)
                })
                .collect();
            let current = held.map(|i| e[i]);
            let selector = TargetSelector::default();

            let first = selector.select(Vec3::ZERO, SEEK, &candidates, current);
            let second = selector.select(Vec3::ZERO, SEEK, &candidates, current);
            prop_assert_eq!(first, second);

            if let Some(choice) = first {
                prop_assert!(candidates.iter().any(|c| c.entity == choice.entity && c.alive));
            } else {
                prop_assert!(candidates.iter().all(|c| !c.alive));
            }
        }

        /// Текущая цель меняется только при перевесе больше switch_margin
        #[test]
        fn prop_no_flicker_within_margin(
            held_distance in 0.0f32..20.0,
            held_health in 0.0f32..=1.0,
            other_distance in 0.0f32..20.0,
            other_health in 0.0f32..=1.0,
        ) {
            let e = entities(2);
            let selector = TargetSelector::default();
            let held = candidate(e[0], held_distance, held_health);
            let other = candidate(e[1], other_distance, other_health);

            let held_score = selector.score(&held, Vec3::ZERO, SEEK, Some(e[0]));
            let other_score = selector.score(&other, Vec3::ZERO, SEEK, Some(e[0]));

            let choice = selector
                .select(Vec3::ZERO, SEEK, &[held, other], Some(e[0]))
                .unwrap();

            if other_score > held_score + selector.weights.switch_margin {
                prop_assert_eq!(choice.entity, e[1]);
            } else {
                prop_assert_eq!(choice.entity, e[0]);
            }
        }
    }
}
