//! Player: marker component + явный контекст "активный игрок"
//!
//! Отмечает entity которым управляет игрок через input (в отличие от AI),
//! и публикует его в `ActivePlayer` — единственный санкционированный способ
//! для AI-таргетинга узнать "где игрок". Никаких глобальных синглтонов:
//! ресурс пишется одной системой при спавне, все остальные только читают.

use bevy::prelude::*;

use crate::logger;

/// Marker component для player-controlled entity
///
/// Акторы БЕЗ этого компонента управляются AI systems.
/// Акторы С этим компонентом получают команды от player input systems.
///
/// # Архитектурная заметка
/// - AI systems используют `Without<Player>` filter (пропускают player-controlled акторов)
/// - Input systems используют `With<Player>` filter (только player-controlled акторы)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Активный игрок сцены (read-only контекст для FollowPlayer таргетинга)
///
/// Писатель ровно один: `track_active_player` при спавне Player.
/// Смерть игрока ресурс НЕ чистит: устаревший entity перестаёт резолвиться
/// сам по себе, и агенты переходят в режим "стоим на месте".
#[derive(Resource, Debug, Default)]
pub struct ActivePlayer(pub Option<Entity>);

impl ActivePlayer {
    pub fn entity(&self) -> Option<Entity> {
        self.0
    }
}

/// Система: регистрация активного игрока при спавне
///
/// Единственный писатель ActivePlayer. Повторный спавн Player — предупреждение
/// (single-player инвариант), но контроль передаётся новому entity.
pub fn track_active_player(
    mut active: ResMut<ActivePlayer>,
    spawned: Query<Entity, Added<Player>>,
) {
    for entity in spawned.iter() {
        if let Some(current) = active.0 {
            if current != entity {
                logger::log_warning(&format!(
                    "Второй Player entity {:?} при живом {:?} — контроль передан новому",
                    entity, current
                ));
            }
        }
        active.0 = Some(entity);
        logger::log(&format!("🧍 Active player: {:?}", entity));
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActivePlayer>();

        // Регистрация до AI-цепочки: агенты видят игрока уже в тик спавна
        app.add_systems(
            FixedUpdate,
            track_active_player.before(crate::SimSet::Ai),
        );
    }
}
