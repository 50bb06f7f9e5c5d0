//! Headless collaborators: vision, navigation, melee без движка.
//!
//! Минимальные stand-ins для end-to-end прогона AI (не pathfinding,
//! не физика). Engine integration заменяет этот плагин своими системами.

use bevy::prelude::*;
use crate::ai::AISet;

pub mod melee;
pub mod navigation;
pub mod vision;

pub use melee::{
    apply_melee_damage, close_to_reach, melee_attack_execution, tick_attack_cooldowns,
    DamageDealt, EntityDied, MeleeHit,
};
pub use navigation::straight_line_navigation;
pub use vision::{proximity_vision, VisionRange, VisionTracking};

/// Headless Plugin
///
/// Порядок в FixedUpdate:
/// - AISet::Sensing: proximity_vision
/// - AISet::Execution: сближение → navigation → cooldowns → melee execution → damage
pub struct HeadlessPlugin;

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VisionTracking>()
            .add_event::<MeleeHit>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(FixedUpdate, proximity_vision.in_set(AISet::Sensing));

        app.add_systems(
            FixedUpdate,
            (
                close_to_reach,
                straight_line_navigation,
                tick_attack_cooldowns,
                melee_attack_execution,
                apply_melee_damage,
            )
                .chain()
                .in_set(AISet::Execution),
        );
    }
}
