//! Per-agent состояние контроллера: курсор дерева, stance тика, кэш цели

use std::sync::Arc;

use bevy::prelude::*;

use super::target_token::TargetToken;
use super::tree::DecisionTree;

/// Мозг агента: разделяемое дерево + личный курсор
///
/// Дерево принадлежит ArchetypeRegistry и переживает любого агента; сто
/// агентов одного архетипа — один DecisionTree в памяти. Курсор всегда
/// валиден: дерево провалидировано, переходы идут только по его рёбрам.
#[derive(Component, Debug, Clone)]
pub struct AIBrain {
    pub tree: Arc<DecisionTree>,
    pub cursor: usize,
    /// Намерение движения текущего тика. Выставляется действиями узла,
    /// сбрасывается в Approach в начале фазы действий.
    pub stance: Stance,
}

impl AIBrain {
    pub fn new(tree: Arc<DecisionTree>) -> Self {
        let cursor = tree.root();
        Self {
            tree,
            cursor,
            stance: Stance::Approach,
        }
    }
}

/// Движенческое намерение тика
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    /// Идти к цели (дефолт каждого тика)
    #[default]
    Approach,
    /// Держать позицию
    Hold,
    /// Отступать от цели
    Withdraw,
}

/// Кэш резолва цели текущего тика + отметка последнего pathfinding-запроса
#[derive(Component, Debug, Clone, Default)]
pub struct ResolvedTarget {
    /// Токен, выданный селектором (или override'ом) в этот тик
    pub token: Option<TargetToken>,
    /// С чем сравнивается материальность смены цели
    pub replanned: Option<ReplanMark>,
}

/// Identity + позиция цели на момент последнего запроса пути
#[derive(Debug, Clone, Copy)]
pub struct ReplanMark {
    pub token: TargetToken,
    pub position: Vec3,
}
