//! Straight-line navigation - headless замена NavigationAgent.
//!
//! Никакого pathfinding: идём по прямой к destination со скоростью
//! MovementSpeed и останавливаемся в stopping_distance от него.

use bevy::prelude::*;
use crate::ai::{Dead, Knockdown};
use crate::components::{MovementCommand, MovementSpeed, NavBounds, NavigationState};

/// System: MovementCommand → Transform + NavigationState
///
/// MoveToPosition принимается в первом же tick (path_pending снимается).
/// По прибытии команда сбрасывается в Idle, has_path = false.
pub fn straight_line_navigation(
    mut agents: Query<
        (&mut Transform, &mut MovementCommand, &mut NavigationState, &MovementSpeed),
        (Without<Dead>, Without<Knockdown>),
    >,
    bounds: Option<Res<NavBounds>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut command, mut nav, speed) in agents.iter_mut() {
        match *command {
            MovementCommand::MoveToPosition { target } => {
                let destination = bounds.as_deref().map_or(target, |b| b.clamp(target));
                let mut offset = destination - transform.translation;
                offset.y = 0.0;

                nav.path_pending = false;
                nav.has_path = true;

                let remaining = (offset.length() - nav.stopping_distance).max(0.0);
                let step = speed.speed * delta;

                if remaining <= step {
                    // Доходим до края stopping radius и стоим
                    if remaining > 0.0 {
                        transform.translation += offset.normalize_or_zero() * remaining;
                    }
                    nav.has_path = false;
                    nav.remaining_distance = 0.0;
                    nav.velocity = Vec3::ZERO;
                    *command = MovementCommand::Idle;
                } else {
                    let direction = offset.normalize_or_zero();
                    transform.translation += direction * step;
                    nav.remaining_distance = remaining - step;
                    nav.velocity = direction * speed.speed;
                }
            }
            MovementCommand::Stop => {
                nav.has_path = false;
                nav.path_pending = false;
                nav.remaining_distance = 0.0;
                nav.velocity = Vec3::ZERO;
                *command = MovementCommand::Idle;
            }
            MovementCommand::Idle => {
                nav.velocity = Vec3::ZERO;
            }
        }

        nav.on_navigable_surface = bounds
            .as_deref()
            .map_or(true, |b| b.contains(transform.translation));
    }
}
