//! Combat компоненты: intent от DecisionCore + характеристики атаки

use bevy::prelude::*;

/// Combat intent - команда DecisionCore для combat executor
///
/// DecisionCore пишет engaged/target, executor выполняет удары
/// (timing, damage - вне AI core).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct CombatIntent {
    pub engaged: bool,
    pub target: Option<Entity>,
}

impl CombatIntent {
    pub fn engage(&mut self, target: Entity) {
        self.engaged = true;
        self.target = Some(target);
    }

    pub fn disengage(&mut self) {
        self.engaged = false;
        self.target = None;
    }
}

/// Attacker - характеристики melee атаки агента
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Урон за удар
    pub base_damage: u32,

    /// Cooldown между атаками (секунды)
    pub attack_cooldown: f32,

    /// Текущий cooldown таймер (уменьшается до 0)
    pub cooldown_timer: f32,

    /// Дальность удара (метры)
    pub reach: f32,
    /// Knockdown цели при попадании (секунды, 0 = без knockdown)
    pub knockdown_duration: f32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            base_damage: 10,
            attack_cooldown: 1.0,
            cooldown_timer: 0.0,
            reach: 2.5,
            knockdown_duration: 0.0,
        }
    }
}

impl Attacker {
    /// Может ли атаковать (cooldown == 0)
    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    /// Начать атаку (сбросить cooldown)
    pub fn start_attack(&mut self) {
        self.cooldown_timer = self.attack_cooldown;
    }

    pub fn tick_cooldown(&mut self, delta: f32) {
        self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
    }
}
