//! AI конфигурация: дистанции, тайминги, веса скоринга, JSON профили.
//!
//! Один согласованный набор параметров (defaults ниже):
//! combat_range 2 < engage_distance 8 < seek_radius 15, disengage × 1.5.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Дистанционные пороги агента (immutable после спавна)
///
/// Инвариант: 0 < combat_range < engage_distance < seek_radius,
/// stopping_distance < combat_range. Нарушения → warning, не panic.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Дистанция входа в Combat (метры)
    pub combat_range: f32,
    /// Дистанция вовлечения (Moving → Combat, база для disengage)
    pub engage_distance: f32,
    /// Радиус поиска (distance score = 0 дальше)
    pub seek_radius: f32,
    /// Радиус патруля вокруг точки спавна
    pub patrol_radius: f32,
    /// Выход из Combat при distance > engage_distance × multiplier
    pub disengage_multiplier: f32,
    /// Stopping distance навигации
    pub stopping_distance: f32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            combat_range: 2.0,
            engage_distance: 8.0,
            seek_radius: 15.0,
            patrol_radius: 10.0,
            disengage_multiplier: 1.5,
            stopping_distance: 1.0,
        }
    }
}

/// Нарушение порядка дистанций
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeWarning {
    #[error("combat_range ({combat_range}) must be positive")]
    NonPositiveCombatRange { combat_range: f32 },

    #[error("engage_distance ({engage_distance}) <= combat_range ({combat_range}): combat entry/exit bands overlap")]
    EngageNotBeyondCombat { combat_range: f32, engage_distance: f32 },

    #[error("seek_radius ({seek_radius}) <= engage_distance ({engage_distance}): targets scored zero inside engage range")]
    SeekNotBeyondEngage { engage_distance: f32, seek_radius: f32 },

    #[error("stopping_distance ({stopping_distance}) >= combat_range ({combat_range}): agent may stop before reaching combat range")]
    StoppingNotInsideCombat { stopping_distance: f32, combat_range: f32 },
}

impl RangeConfig {
    /// Дистанция выхода из Combat (disengage hysteresis)
    pub fn disengage_distance(&self) -> f32 {
        self.engage_distance * self.disengage_multiplier
    }

    /// Проверяет порядок дистанций. Ничего не исправляет.
    pub fn validate(&self) -> Vec<RangeWarning> {
        let mut warnings = Vec::new();

        if self.combat_range <= 0.0 {
            warnings.push(RangeWarning::NonPositiveCombatRange {
                combat_range: self.combat_range,
            });
        }
        if self.engage_distance <= self.combat_range {
            warnings.push(RangeWarning::EngageNotBeyondCombat {
                combat_range: self.combat_range,
                engage_distance: self.engage_distance,
            });
        }
        if self.seek_radius <= self.engage_distance {
            warnings.push(RangeWarning::SeekNotBeyondEngage {
                engage_distance: self.engage_distance,
                seek_radius: self.seek_radius,
            });
        }
        if self.stopping_distance >= self.combat_range {
            warnings.push(RangeWarning::StoppingNotInsideCombat {
                stopping_distance: self.stopping_distance,
                combat_range: self.combat_range,
            });
        }

        warnings
    }

    /// validate() + warning в лог на каждое нарушение
    pub fn validate_and_log(&self) -> Vec<RangeWarning> {
        let warnings = self.validate();
        for warning in &warnings {
            crate::log_warning(&format!("⚠️ RangeConfig: {}", warning));
        }
        warnings
    }
}

/// Тайминги decision loop (секунды)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionTiming {
    /// Интервал decision tick (10 Hz по умолчанию)
    pub decision_interval: f32,
    /// Сколько стоим в Idle до патрульной точки
    pub idle_time: f32,
    /// Как часто Moving пересчитывает destination
    pub path_recalc_interval: f32,
    /// remaining_distance ниже порога = прибыли
    pub arrival_threshold: f32,
    /// Скорость ниже порога = стоим
    pub stopped_speed: f32,
}

impl Default for DecisionTiming {
    fn default() -> Self {
        Self {
            decision_interval: 0.1,
            idle_time: 3.0,
            path_recalc_interval: 0.5,
            arrival_threshold: 0.5,
            stopped_speed: 0.1,
        }
    }
}

/// Веса target scoring
///
/// score = distance × distance_score + health × health_score + stability (если current)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub distance: f32,
    pub health: f32,
    /// Бонус текущей цели
    pub stability_bonus: f32,
    /// Новая цель должна обогнать текущую больше чем на margin
    pub switch_margin: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: 0.5,
            health: 0.3,
            stability_bonus: 0.3,
            switch_margin: 0.2,
        }
    }
}

/// Полный AI профиль (грузится из JSON, все поля опциональны)
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct AIProfile {
    pub ranges: RangeConfig,
    pub timing: DecisionTiming,
    pub weights: ScoreWeights,
}

/// Ошибки загрузки профиля
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read AI profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse AI profile: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AIProfile {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges_are_consistent() {
        let ranges = RangeConfig::default();
        assert!(ranges.validate().is_empty());
        assert_eq!(ranges.disengage_distance(), 12.0);
    }

    #[test]
    fn test_inverted_ranges_warn_but_keep_values() {
        let ranges = RangeConfig {
            combat_range: 5.0,
            engage_distance: 4.0,
            seek_radius: 3.0,
            stopping_distance: 6.0,
            ..Default::default()
        };

        let warnings = ranges.validate_and_log();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.contains(&RangeWarning::EngageNotBeyondCombat {
            combat_range: 5.0,
            engage_distance: 4.0,
        }));
        assert!(warnings.contains(&RangeWarning::SeekNotBeyondEngage {
            engage_distance: 4.0,
            seek_radius: 3.0,
        }));
        assert!(warnings.contains(&RangeWarning::StoppingNotInsideCombat {
            stopping_distance: 6.0,
            combat_range: 5.0,
        }));

        // Значения не трогаем
        assert_eq!(ranges.combat_range, 5.0);
    }

    #[test]
    fn test_zero_combat_range_warns() {
        let ranges = RangeConfig {
            combat_range: 0.0,
            stopping_distance: -1.0,
            ..Default::default()
        };
        assert_eq!(
            ranges.validate(),
            vec![RangeWarning::NonPositiveCombatRange { combat_range: 0.0 }]
        );
    }

    #[test]
    fn test_profile_partial_json_uses_defaults() {
        let profile = AIProfile::from_json_str(
            r#"{ "ranges": { "combat_range": 3.0 }, "timing": { "idle_time": 1.5 } }"#,
        )
        .unwrap();

        assert_eq!(profile.ranges.combat_range, 3.0);
        assert_eq!(profile.ranges.engage_distance, 8.0);
        assert_eq!(profile.timing.idle_time, 1.5);
        assert_eq!(profile.timing.decision_interval, 0.1);
        assert_eq!(profile.weights, ScoreWeights::default());
    }

    #[test]
    fn test_profile_parse_error() {
        let err = AIProfile::from_json_str("{ ranges: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_profile_missing_file() {
        let err = AIProfile::load("/definitely/not/here/profile.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
