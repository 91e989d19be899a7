//! Внешние события AI-контура

use bevy::prelude::*;

use super::target_token::TargetToken;

/// Принудительный токен цели для агента — действует ровно один тик
///
/// Скриптовый триггер или дизайнерский override: в тик чтения заменяет
/// выдачу селектора, со следующего тика резолюция возвращается к обычной.
/// Несколько событий на одного агента за тик — побеждает последнее.
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetOverride {
    pub agent: Entity,
    pub token: TargetToken,
}
