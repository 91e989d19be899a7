//! Управляющий контур врага: шесть систем строгой цепочкой, один тик — один проход
//!
//! Порядок (chain в AIPlugin):
//! 1. acquire_targets — override/селектор → токен тика
//! 2. advance_brains — не больше одного перехода курсора по дереву
//! 3. run_node_actions — действия текущего узла (каждый тик, пока узел текущий)
//! 4. return_from_leaves — лист → root ПОСЛЕ действий того же тика
//! 5. write_headings — heading в MovementInput (ZERO когда цель не резолвится)
//! 6. request_replans — pathfinding-запрос ТОЛЬКО при материальной смене цели
//!
//! Нерезолвящаяся цель нигде не ошибка: агент стоит тик и пробует снова.
//! Один агент не может уронить батч — все фолбэки локальные.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::combat::{AttackIntent, WeaponStats};
use crate::components::{Health, MovementInput, PathTarget, PathfindingAgent, Stamina};
use crate::logger;
use crate::player::{ActivePlayer, Player};
use crate::DeterministicRng;

use super::brain::{AIBrain, ReplanMark, ResolvedTarget, Stance};
use super::decision::DecisionContext;
use super::events::TargetOverride;
use super::target_token::TargetToken;
use super::targeting::TargetSelector;
use super::tree::NodeAction;

/// Система: выдача токена цели на текущий тик
///
/// TargetOverride события тика важнее селектора (последнее на агента
/// побеждает). FollowPlayer без игрока → None: агент стоит, не ошибка.
pub fn acquire_targets(
    mut agents: Query<(Entity, &TargetSelector, &mut ResolvedTarget), Without<Player>>,
    mut overrides: EventReader<TargetOverride>,
    active_player: Res<ActivePlayer>,
) {
    let mut forced: HashMap<Entity, TargetToken> = HashMap::new();
    for event in overrides.read() {
        forced.insert(event.agent, event.token);
    }

    for (agent, selector, mut resolved) in agents.iter_mut() {
        resolved.token = forced
            .get(&agent)
            .copied()
            .or_else(|| selector.select(&active_player));
    }
}

/// Система: один переход курсора за тик
///
/// Дети текущего узла сканируются в авторском порядке, побеждает первый
/// true-гейт; ни одного — курсор стоит. Контекст собирается из текущего
/// резолва; отсутствующие Health/Stamina считаются полными.
pub fn advance_brains(
    mut agents: Query<
        (
            Entity,
            &mut AIBrain,
            &ResolvedTarget,
            &Transform,
            Option<&Health>,
            Option<&Stamina>,
        ),
        Without<Player>,
    >,
    positions: Query<&Transform>,
    mut rng: ResMut<DeterministicRng>,
) {
    for (agent, mut brain, resolved, transform, health, stamina) in agents.iter_mut() {
        let agent_position = transform.translation;
        let target_position = resolved.token.and_then(|token| {
            token.resolve(|e| positions.get(e).ok().map(|t| t.translation))
        });

        let ctx = DecisionContext {
            agent_position,
            target_distance: target_position.map(|p| p.distance(agent_position)),
            target_resolved: target_position.is_some(),
            health_fraction: health.map_or(1.0, Health::fraction),
            stamina_fraction: stamina.map_or(1.0, Stamina::fraction),
        };

        let next = brain.tree.advance(brain.cursor, &ctx, &mut rng.rng);
        if next != brain.cursor {
            logger::log(&format!("🔀 {:?}: узел {} → {}", agent, brain.cursor, next));
            brain.cursor = next;
        }
    }
}

/// Система: выполнение действий текущего узла
///
/// Stance сбрасывается в Approach каждый тик, действия применяются в
/// авторском порядке. Attack — единственное действие с внешним эффектом,
/// все его гейты (dynamic-цель, радиус, cooldown, stamina) тихие no-op'ы.
pub fn run_node_actions(
    mut agents: Query<
        (
            Entity,
            &mut AIBrain,
            &ResolvedTarget,
            &Transform,
            Option<&mut WeaponStats>,
            Option<&mut Stamina>,
        ),
        Without<Player>,
    >,
    positions: Query<&Transform>,
    mut attacks: EventWriter<AttackIntent>,
) {
    for (agent, mut brain, resolved, transform, mut weapon, mut stamina) in agents.iter_mut() {
        brain.stance = Stance::Approach;

        let tree = brain.tree.clone();
        for action in &tree.node(brain.cursor).actions {
            match action {
                NodeAction::HoldGround => brain.stance = Stance::Hold,
                NodeAction::Retreat => brain.stance = Stance::Withdraw,
                NodeAction::Attack => {
                    if let Some(weapon) = weapon.as_deref_mut() {
                        try_attack(
                            agent,
                            transform,
                            resolved,
                            weapon,
                            stamina.as_deref_mut(),
                            &positions,
                            &mut attacks,
                        );
                    }
                }
            }
        }
    }
}

/// Попытка атаки: dynamic-цель, радиус оружия, cooldown, stamina.
/// Любой несработавший гейт — тихий no-op, попробуем следующий тик.
fn try_attack(
    attacker: Entity,
    transform: &Transform,
    resolved: &ResolvedTarget,
    weapon: &mut WeaponStats,
    stamina: Option<&mut Stamina>,
    positions: &Query<&Transform>,
    attacks: &mut EventWriter<AttackIntent>,
) {
    let Some(TargetToken::Dynamic { target }) = resolved.token else {
        return; // точку мира атаковать нельзя
    };
    let Ok(target_transform) = positions.get(target) else {
        return; // цель в этот тик не резолвится
    };
    if !weapon.is_ready() {
        return;
    }
    let distance = transform.translation.distance(target_transform.translation);
    if distance > weapon.attack_radius {
        return;
    }
    if let Some(stamina) = stamina {
        if !stamina.consume(weapon.stamina_cost) {
            return;
        }
    }

    weapon.start_cooldown();
    attacks.write(AttackIntent {
        attacker,
        target,
        damage: weapon.base_damage,
    });
    logger::log(&format!(
        "⚔️ {:?} атакует {:?} (дистанция {:.2})",
        attacker, target, distance
    ));
}

/// Система: возврат листа к корню
///
/// Отдельная фаза ПОСЛЕ действий: лист успевает отработать тик, возврат
/// не стоит дополнительного тика. Root-лист остаётся на месте навсегда.
pub fn return_from_leaves(mut agents: Query<&mut AIBrain, Without<Player>>) {
    for mut brain in agents.iter_mut() {
        let next = brain.tree.after_actions(brain.cursor);
        if next != brain.cursor {
            brain.cursor = next;
        }
    }
}

/// Система: запись desired heading в MovementInput
///
/// База — направление на resolved-цель; stance модифицирует (Hold → ZERO,
/// Withdraw → инверсия). Не резолвится → ZERO: стоим, ждём следующего тика.
/// Пишем только при изменении, чтобы не дёргать Changed<MovementInput>.
pub fn write_headings(
    mut agents: Query<
        (&AIBrain, &ResolvedTarget, &Transform, &mut MovementInput),
        Without<Player>,
    >,
    positions: Query<&Transform>,
) {
    for (brain, resolved, transform, mut input) in agents.iter_mut() {
        let base = match resolved.token {
            Some(token) => token.heading_from(transform.translation, |e| {
                positions.get(e).ok().map(|t| t.translation)
            }),
            None => Vec3::ZERO,
        };
        let direction = match brain.stance {
            Stance::Approach => base,
            Stance::Hold => Vec3::ZERO,
            Stance::Withdraw => -base,
        };
        if input.direction != direction {
            input.direction = direction;
        }
    }
}

/// Система: pathfinding-запрос только при материальной смене цели
///
/// Материальность: первый запрос вообще, смена referent'а, или уход
/// resolved-позиции за replan_distance от позиции последнего запроса.
/// Нерезолвящаяся цель запросов не порождает.
pub fn request_replans(
    mut agents: Query<(Entity, &mut ResolvedTarget, &mut PathfindingAgent), Without<Player>>,
    positions: Query<&Transform>,
) {
    for (agent, mut resolved, mut pathfinding) in agents.iter_mut() {
        let Some(token) = resolved.token else {
            continue;
        };
        let Some(position) =
            token.resolve(|e| positions.get(e).ok().map(|t| t.translation))
        else {
            continue;
        };

        if !is_material_change(
            resolved.replanned.as_ref(),
            &token,
            position,
            pathfinding.replan_distance,
        ) {
            continue;
        }

        let path_target = match token {
            TargetToken::Point { point } => PathTarget::Point(point),
            TargetToken::Dynamic { target } => PathTarget::Entity(target),
        };
        pathfinding.set_target(path_target);
        resolved.replanned = Some(ReplanMark { token, position });
        logger::log(&format!(
            "🧭 {:?}: replan #{} → {:?}",
            agent, pathfinding.replans, path_target
        ));
    }
}

/// Материальна ли смена цели относительно последнего запроса
fn is_material_change(
    mark: Option<&ReplanMark>,
    token: &TargetToken,
    position: Vec3,
    threshold: f32,
) -> bool {
    match mark {
        None => true,
        Some(mark) => {
            !mark.token.same_referent(token) || mark.position.distance(position) > threshold
        }
    }
}
