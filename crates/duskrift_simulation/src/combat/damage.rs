//! Применение урона и смерть акторов

use bevy::prelude::*;

use crate::components::Health;
use crate::logger;

/// Намерение атаки (пишется AI-контуром, применяется в этом же тике)
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
}

/// Нанесённый урон (для UI/анимаций в engine shell)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: u32,
    pub remaining_health: u32,
}

/// Смерть актора. В этом же тике следует despawn.
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Entity,
}

/// Система: применение AttackIntent к Health
///
/// EntityDied — ровно один раз на жертву (переход alive → dead), даже если
/// несколько атакующих добили её в одном тике.
pub fn apply_attacks(
    mut intents: EventReader<AttackIntent>,
    mut victims: Query<&mut Health>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
) {
    for intent in intents.read() {
        let Ok(mut health) = victims.get_mut(intent.target) else {
            continue; // жертва уже исчезла из мира
        };

        let was_alive = health.is_alive();
        health.take_damage(intent.damage);

        damage_events.write(DamageDealt {
            attacker: intent.attacker,
            target: intent.target,
            amount: intent.damage,
            remaining_health: health.current,
        });

        if was_alive && !health.is_alive() {
            logger::log(&format!("💀 {:?} убит {:?}", intent.target, intent.attacker));
            death_events.write(EntityDied {
                entity: intent.target,
                killer: intent.attacker,
            });
        }
    }
}

/// Система: despawn умерших
///
/// Despawn — источник liveness для всего AI-контура: dynamic-токены на
/// умершего перестают резолвиться со следующего запроса.
pub fn despawn_dead(mut commands: Commands, mut deaths: EventReader<EntityDied>) {
    for death in deaths.read() {
        commands.entity(death.entity).despawn();
    }
}
