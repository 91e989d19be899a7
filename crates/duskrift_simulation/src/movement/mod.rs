//! Кинематическая интеграция движения: MovementInput → Transform
//!
//! Headless stand-in физического слоя. Engine shell в продакшене заменяет
//! его CharacterBody/NavigationAgent'ом; семантика intent'а та же:
//! direction × speed × fixed delta, никаких коллизий и гравитации здесь.
//!
//! Детерминизм: fixed timestep (60Hz), порядок после SimSet::Combat.

use bevy::prelude::*;

use crate::components::{MovementInput, MovementSpeed};
use crate::SimSet;

/// Система применения движения от intent'а
///
/// ZERO direction — стоим (порог отсекает денормализованный мусор).
pub fn integrate_movement(
    mut movers: Query<(&MovementInput, &MovementSpeed, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (input, speed, mut transform) in movers.iter_mut() {
        if input.direction.length_squared() > 0.01 {
            let direction = input.direction.normalize();
            transform.translation += direction * speed.speed * delta;
        }
    }
}

/// Movement Plugin (последняя фаза тика)
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, integrate_movement.in_set(SimSet::Movement));
    }
}
