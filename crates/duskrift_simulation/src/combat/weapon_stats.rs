//! Унифицированные характеристики оружия агента

use bevy::prelude::*;

/// Характеристики оружия (melee-профиль по умолчанию)
///
/// cooldown_timer > 0 — оружие на перезарядке; тикается в SimSet::Combat.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WeaponStats {
    pub base_damage: u32,
    /// Радиус применения (метры)
    pub attack_radius: f32,
    /// Полный цикл перезарядки (секунды)
    pub attack_cooldown: f32,
    /// Остаток перезарядки (0.0 = готово)
    pub cooldown_timer: f32,
    /// Стоимость замаха в stamina
    pub stamina_cost: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            base_damage: 15,
            attack_radius: 2.0,
            attack_cooldown: 1.2,
            cooldown_timer: 0.0,
            stamina_cost: 20.0,
        }
    }
}

impl WeaponStats {
    pub fn is_ready(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown_timer = self.attack_cooldown;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }
}

/// Система: перезарядка оружия
pub fn tick_weapon_cooldowns(mut weapons: Query<&mut WeaponStats>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    for mut weapon in weapons.iter_mut() {
        if !weapon.is_ready() {
            weapon.tick(delta);
        }
    }
}
