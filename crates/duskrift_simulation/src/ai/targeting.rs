//! TargetSelector — закрытый набор провайдеров цели
//!
//! Вместо подкласса-на-вариант — enum: матчинг исчерпывающий, downcast'ов
//! нет, новый провайдер = новый вариант + одна ветка в select.

use bevy::prelude::*;

use crate::player::ActivePlayer;

use super::target_token::TargetToken;

/// Провайдер цели агента. Выдаёт токен каждый тик, сам позиций не хранит.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum TargetSelector {
    /// Преследовать активного игрока (через общий контекст ActivePlayer)
    FollowPlayer,
    /// Идти к авторской точке (охрана позиции, точка патруля)
    StaticPoint { point: Vec3 },
    /// Сопровождать произвольный entity сцены (эскорт, лидер группы)
    TrackEntity { target: Entity },
}

impl TargetSelector {
    /// Hook инициализации при биндинге к агенту
    ///
    /// Текущим вариантам не нужен; оставлен как точка расширения для
    /// провайдеров с предвычисляемым состоянием.
    pub fn bind(&mut self, _agent: Entity) {}

    /// Выдать токен цели на текущий тик
    ///
    /// Side-effect-free и детерминирован при равном состоянии мира.
    /// FollowPlayer без зарегистрированного игрока — None, не ошибка.
    pub fn select(&self, active_player: &ActivePlayer) -> Option<TargetToken> {
        match self {
            TargetSelector::FollowPlayer => active_player.entity().map(TargetToken::dynamic),
            TargetSelector::StaticPoint { point } => Some(TargetToken::point(*point)),
            TargetSelector::TrackEntity { target } => Some(TargetToken::dynamic(*target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_player_without_player_yields_none() {
        let selector = TargetSelector::FollowPlayer;
        assert_eq!(selector.select(&ActivePlayer(None)), None);
    }

    #[test]
    fn test_follow_player_maps_active_entity() {
        let player = Entity::from_raw(3);
        let selector = TargetSelector::FollowPlayer;
        assert_eq!(
            selector.select(&ActivePlayer(Some(player))),
            Some(TargetToken::dynamic(player))
        );
    }

    #[test]
    fn test_static_point_always_yields_its_point() {
        let point = Vec3::new(10.0, 0.0, -5.0);
        let selector = TargetSelector::StaticPoint { point };
        assert_eq!(selector.select(&ActivePlayer(None)), Some(TargetToken::point(point)));
    }

    #[test]
    fn test_track_entity_yields_dynamic_token_even_for_dead_referent() {
        // Liveness проверяется на резолве, не на выдаче токена
        let ghost = Entity::from_raw(99);
        let selector = TargetSelector::TrackEntity { target: ghost };
        assert_eq!(
            selector.select(&ActivePlayer(None)),
            Some(TargetToken::dynamic(ghost))
        );
    }
}
