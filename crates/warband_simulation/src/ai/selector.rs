//! Target selection: scoring + anti-flicker switching policy.
//!
//! score = 0.5 × distance_score + 0.3 × health_score + stability_bonus
//! - distance_score = 1 − clamp01(distance / seek_radius)
//! - health_score = 1 − health_fraction (добиваем раненых)
//! - stability_bonus = 0.3 только для текущей цели
//!
//! Новая цель заменяет текущую только если new_score > current_score + 0.2.
//! Pure functions: никакого состояния между вызовами.

use bevy::prelude::*;
use crate::ai::config::ScoreWeights;

/// Кандидат для скоринга (snapshot живого hostile агента)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub entity: Entity,
    pub position: Vec3,
    /// 0.0..=1.0
    pub health_fraction: f32,
    pub alive: bool,
}

/// Результат выбора
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredTarget {
    pub entity: Entity,
    pub score: f32,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetSelector {
    pub weights: ScoreWeights,
}

impl TargetSelector {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score одного кандидата относительно `origin`
    pub fn score(
        &self,
        candidate: &TargetCandidate,
        origin: Vec3,
        seek_radius: f32,
        current: Option<Entity>,
    ) -> f32 {
        let distance = origin.distance(candidate.position);
        let distance_score = if seek_radius > 0.0 {
            1.0 - (distance / seek_radius).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let health_score = 1.0 - candidate.health_fraction.clamp(0.0, 1.0);
        let stability = if current == Some(candidate.entity) {
            self.weights.stability_bonus
        } else {
            0.0
        };

        self.weights.distance * distance_score + self.weights.health * health_score + stability
    }

    /// Лучшая цель с учётом switching policy.
    ///
    /// Мёртвые кандидаты отбрасываются. При равенстве score выигрывает
    /// кандидат раньше в списке (порядок perception).
    /// None если живых кандидатов нет.
    pub fn select(
        &self,
        origin: Vec3,
        seek_radius: f32,
        candidates: &[TargetCandidate],
        current: Option<Entity>,
    ) -> Option<ScoredTarget> {
        let mut incumbent: Option<ScoredTarget> = None;
        let mut challenger: Option<ScoredTarget> = None;

        for candidate in candidates.iter().filter(|c| c.alive) {
            let scored = ScoredTarget {
                entity: candidate.entity,
                score: self.score(candidate, origin, seek_radius, current),
                distance: origin.distance(candidate.position),
            };

            if current == Some(candidate.entity) {
                incumbent.get_or_insert(scored);
                continue;
            }

            match challenger {
                Some(best) if scored.score <= best.score => {}
                _ => challenger = Some(scored),
            }
        }

        match (incumbent, challenger) {
            (Some(held), Some(other)) => {
                if other.score > held.score + self.weights.switch_margin {
                    Some(other)
                } else {
                    Some(held)
                }
            }
            (Some(held), None) => Some(held),
            (None, other) => other,
        }
    }
}
