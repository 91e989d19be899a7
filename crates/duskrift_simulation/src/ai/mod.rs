//! AI модуль: таргетинг, дерево решений, управляющий контур врага
//!
//! Архитектура:
//! - target_token / targeting — ГДЕ цель (ленивый резолв, Option-liveness)
//! - decision / tree — КУДА переходить (валидированная arena, FSM-обход)
//! - brain / control — per-tick контур агента (шесть систем цепочкой)
//! - archetypes — реестр деревьев + fallible spawn/bind
//!
//! Архитектурные решения: docs/decisions/ADR-001-simulation-core-shell-split.md,
//! ADR-002 (авторский порядок детей при обходе).

use bevy::prelude::*;

pub mod archetypes;
pub mod brain;
pub mod control;
pub mod decision;
pub mod events;
pub mod target_token;
pub mod targeting;
pub mod tree;

// Re-export основных типов
pub use archetypes::{bind_brain, spawn_enemy, AgentBindError, ArchetypeRegistry};
pub use brain::{AIBrain, ReplanMark, ResolvedTarget, Stance};
pub use decision::{Decision, DecisionContext, DecisionKind};
pub use events::TargetOverride;
pub use target_token::TargetToken;
pub use targeting::TargetSelector;
pub use tree::{DecisionTree, NodeAction, TreeConfigError, TreeDef, TreeNode};

use crate::SimSet;

/// AI Plugin
///
/// Регистрирует контур врага в FixedUpdate (SimSet::Ai).
/// Порядок выполнения:
/// 1. acquire_targets — override/селектор → токен тика
/// 2. advance_brains — один переход курсора
/// 3. run_node_actions — действия текущего узла
/// 4. return_from_leaves — лист → root после действий
/// 5. write_headings — heading в MovementInput
/// 6. request_replans — запросы пути при материальной смене цели
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArchetypeRegistry>()
            .add_event::<TargetOverride>()
            .add_systems(
                FixedUpdate,
                (
                    control::acquire_targets,
                    control::advance_brains,
                    control::run_node_actions,
                    control::return_from_leaves,
                    control::write_headings,
                    control::request_replans,
                )
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(SimSet::Ai),
            );
    }
}
