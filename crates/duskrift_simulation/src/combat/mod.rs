//! Combat модуль: оружие, урон, смерть
//!
//! ECS ответственность:
//! - Game state: Health, Stamina, WeaponStats
//! - Combat rules: cooldown, радиус, stamina cost
//! - Events: AttackIntent → DamageDealt / EntityDied
//!
//! Engine shell ответственность:
//! - Анимации замаха, hitbox-валидация, VFX — по событиям DamageDealt

use bevy::prelude::*;

pub mod damage;
pub mod stamina;
pub mod weapon_stats;

// Re-export основных типов
pub use damage::{apply_attacks, despawn_dead, AttackIntent, DamageDealt, EntityDied};
pub use stamina::regenerate_stamina;
pub use weapon_stats::{tick_weapon_cooldowns, WeaponStats};

use crate::SimSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (SimSet::Combat, после AI).
///
/// Порядок выполнения:
/// 1. tick_weapon_cooldowns — перезарядка
/// 2. apply_attacks — AttackIntent текущего тика → урон
/// 3. regenerate_stamina — восстановление выносливости
/// 4. despawn_dead — умершие покидают мир
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackIntent>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (
                tick_weapon_cooldowns,
                apply_attacks,
                regenerate_stamina,
                despawn_dead,
            )
                .chain()
                .in_set(SimSet::Combat),
        );
    }
}
