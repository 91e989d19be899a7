//! Реестр архетипов + fallible привязка контроллера к entity
//!
//! Все ошибки этого файла — ошибки setup'а (загрузка контента, спавн).
//! Они возвращаются звонящему и логируются; в рантайм-тик не попадают.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use crate::combat::WeaponStats;
use crate::components::{Actor, MovementInput, MovementSpeed, PathfindingAgent};
use crate::logger;

use super::brain::{AIBrain, ResolvedTarget};
use super::targeting::TargetSelector;
use super::tree::{DecisionTree, TreeConfigError, TreeDef};

/// Ошибки привязки контроллера. Fatal на спавне, не в рантайме.
#[derive(Debug, Error)]
pub enum AgentBindError {
    #[error("архетип '{name}' не зарегистрирован")]
    UnknownArchetype { name: String },

    #[error("у entity {entity:?} нет Transform")]
    MissingTransform { entity: Entity },

    #[error("у entity {entity:?} нет MovementInput")]
    MissingMovement { entity: Entity },

    #[error("у entity {entity:?} нет PathfindingAgent")]
    MissingPathfinding { entity: Entity },
}

/// Реестр валидированных деревьев решений по имени архетипа
///
/// Дерево строится и валидируется один раз, дальше шарится через Arc:
/// сто агентов одного архетипа — одно дерево в памяти.
#[derive(Resource, Debug, Default)]
pub struct ArchetypeRegistry {
    trees: HashMap<String, Arc<DecisionTree>>,
}

impl ArchetypeRegistry {
    /// Зарегистрировать архетип из программной модели
    ///
    /// Ошибка валидации — отказ архетипу целиком, реестр не меняется.
    pub fn register(&mut self, name: &str, def: TreeDef) -> Result<(), TreeConfigError> {
        let tree = DecisionTree::from_def(def)?;
        logger::log(&format!(
            "📜 Архетип '{}': {} узлов, глубина {}",
            name,
            tree.len(),
            tree.depth()
        ));
        self.trees.insert(name.to_string(), Arc::new(tree));
        Ok(())
    }

    /// Зарегистрировать архетип из RON-текста (авторский формат)
    pub fn register_ron(&mut self, name: &str, source: &str) -> Result<(), TreeConfigError> {
        let def: TreeDef =
            ron::from_str(source).map_err(|e| TreeConfigError::Parse(e.to_string()))?;
        self.register(name, def)
    }

    pub fn get(&self, name: &str) -> Option<Arc<DecisionTree>> {
        self.trees.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trees.contains_key(name)
    }
}

/// Привязать контроллер архетипа к существующему entity
///
/// Коллабораторы (Transform, MovementInput, PathfindingAgent) обязаны уже
/// стоять на entity: их отсутствие — ошибка спавна, а не тихая деградация
/// в рантайме.
pub fn bind_brain(
    world: &mut World,
    agent: Entity,
    archetype: &str,
    mut selector: TargetSelector,
) -> Result<(), AgentBindError> {
    let tree = world
        .resource::<ArchetypeRegistry>()
        .get(archetype)
        .ok_or_else(|| AgentBindError::UnknownArchetype {
            name: archetype.to_string(),
        })?;

    if world.get::<Transform>(agent).is_none() {
        return Err(AgentBindError::MissingTransform { entity: agent });
    }
    if world.get::<MovementInput>(agent).is_none() {
        return Err(AgentBindError::MissingMovement { entity: agent });
    }
    if world.get::<PathfindingAgent>(agent).is_none() {
        return Err(AgentBindError::MissingPathfinding { entity: agent });
    }

    selector.bind(agent);
    world
        .entity_mut(agent)
        .insert((AIBrain::new(tree), ResolvedTarget::default(), selector));

    logger::log(&format!("🧠 {:?} привязан к архетипу '{}'", agent, archetype));
    Ok(())
}

/// Заспавнить врага полным комплектом и привязать контроллер
///
/// Ошибка привязки откатывает спавн (entity не протекает в мир).
pub fn spawn_enemy(
    world: &mut World,
    position: Vec3,
    archetype: &str,
    selector: TargetSelector,
) -> Result<Entity, AgentBindError> {
    let agent = world
        .spawn((
            Actor { faction_id: 2 },
            Transform::from_translation(position),
            MovementInput::default(),
            MovementSpeed::default(),
            PathfindingAgent::default(),
            WeaponStats::default(),
        ))
        .id();

    if let Err(err) = bind_brain(world, agent, archetype, selector) {
        world.despawn(agent);
        return Err(err);
    }
    Ok(agent)
}
