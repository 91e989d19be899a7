//! Регенерация stamina на фиксированном тике

use bevy::prelude::*;

use crate::components::Stamina;

/// Система: пассивная регенерация выносливости
///
/// Guard по max — не дёргаем change detection у полных акторов.
pub fn regenerate_stamina(mut actors: Query<&mut Stamina>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    for mut stamina in actors.iter_mut() {
        if stamina.current < stamina.max {
            stamina.regenerate(delta);
        }
    }
}
