//! Movement компоненты: желаемое направление, скорость, pathfinding-запросы

use bevy::prelude::*;

/// Желаемое направление движения актора (world coordinates, unit vector или ZERO)
///
/// Архитектура:
/// - AI система пишет direction каждый тик (high-level intent)
/// - Интегратор движения (или engine shell с реальной физикой) читает и применяет
/// - ZERO означает "стоять на месте" — не ошибка, а штатное состояние
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementInput {
    pub direction: Vec3,
}

/// Скорость движения актора (метры/сек)
#[derive(Component, Clone, Copy, Debug)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 2.0 } // 2 m/s — базовая скорость ходьбы
    }
}

/// Цель pathfinding-запроса: фиксированная точка или живой entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathTarget {
    Point(Vec3),
    Entity(Entity),
}

/// Интерфейс к внешнему pathfinding-провайдеру (navmesh живёт в engine shell)
///
/// Проблема:
/// - Перестройка пути — дорогая операция (navmesh query каждый тик → спам)
///
/// Решение:
/// - set_target вызывается ТОЛЬКО при материальной смене цели:
///   сменился referent, или resolved-позиция отошла > replan_distance
///   от позиции последнего запроса
/// - Нерезолвится цель → запрос НЕ отправляется (ждём следующий тик)
///
/// Shell читает target при изменении компонента и строит путь сам.
#[derive(Component, Debug, Clone)]
pub struct PathfindingAgent {
    /// Последний отправленный запрос (None до первого replan'а)
    pub target: Option<PathTarget>,

    /// Порог материального смещения цели (метры)
    pub replan_distance: f32,

    /// Счётчик отправленных запросов (диагностика + тесты change-detection)
    pub replans: u32,
}

impl Default for PathfindingAgent {
    fn default() -> Self {
        Self {
            target: None,
            replan_distance: 1.0,
            replans: 0,
        }
    }
}

impl PathfindingAgent {
    /// Отправить новый запрос пути. Вызывать только при материальной смене цели.
    pub fn set_target(&mut self, target: PathTarget) {
        self.target = Some(target);
        self.replans += 1;
    }
}
