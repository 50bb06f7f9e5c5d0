//! Movement компоненты: команды движения, состояние навигации, скорость

use bevy::prelude::*;

/// Команда движения для агента (выполняется navigation layer)
///
/// Архитектура:
/// - DecisionCore пишет MovementCommand (high-level intent)
/// - Navigation layer читает, ведёт агента, отчитывается через NavigationState
/// - Новая команда всегда заменяет предыдущую (нет cancellation token)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementCommand {
    /// Ничего не делать
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Остановиться немедленно (сбросить path и velocity)
    Stop,
}

/// Обратная связь navigation layer → DecisionCore
///
/// `path_pending` выставляется при новой команде и снимается когда
/// navigation layer её принял - иначе "прибытие" засчитается до старта.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct NavigationState {
    pub has_path: bool,
    pub path_pending: bool,
    pub remaining_distance: f32,
    pub velocity: Vec3,
    pub on_navigable_surface: bool,
    /// Последний принятый destination
    pub destination: Option<Vec3>,
    /// Остановка в этом радиусе от destination (метры)
    pub stopping_distance: f32,
}

impl NavigationState {
    pub fn with_stopping_distance(stopping_distance: f32) -> Self {
        Self {
            stopping_distance,
            ..Default::default()
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            has_path: false,
            path_pending: false,
            remaining_distance: 0.0,
            velocity: Vec3::ZERO,
            on_navigable_surface: true,
            destination: None,
            stopping_distance: 1.0,
        }
    }
}

/// Скорость движения агента (метры/сек)
#[derive(Component, Clone, Copy, Debug)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 3.5 }
    }
}

/// Границы navigable области (прямоугольник в XZ)
///
/// Нет ресурса → вся плоскость navigable.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct NavBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl NavBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.y && point.z <= self.max.y
    }

    /// Ближайшая navigable точка (y сохраняется)
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y,
            point.z.clamp(self.min.y, self.max.y),
        )
    }

    /// Проекция candidate на область; None если ближайшая точка дальше `max_distance`
    pub fn sample(&self, candidate: Vec3, max_distance: f32) -> Option<Vec3> {
        let projected = self.clamp(candidate);
        (projected.distance(candidate) <= max_distance).then_some(projected)
    }
}
