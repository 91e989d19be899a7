//! DecisionTree — неизменяемое дерево решений + FSM обхода
//!
//! Архитектура:
//! - Flat-arena: `Vec<TreeNode>`, рёбра = индексы (без Box-рекурсии)
//! - Валидация ОДИН раз при регистрации архетипа (fatal TreeConfigError);
//!   после неё обход физически не может выйти за границы arena
//! - Обход — чистая FSM: `advance` делает не больше одного перехода за тик,
//!   `after_actions` возвращает лист к корню ПОСЛЕ действий того же тика
//! - Один `Arc<DecisionTree>` шарится между всеми агентами архетипа;
//!   per-agent состояние — только курсор в AIBrain

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logger;

use super::decision::{Decision, DecisionContext};

/// Непрерывное действие узла: выполняется каждый тик, пока узел текущий
/// (не entry-callback). Узел без движенческого действия идёт к цели
/// дефолтным heading'ом.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeAction {
    /// Атаковать resolved dynamic-цель (cooldown, stamina и радиус оружия
    /// гейтят внутри; point-цель атаковать нельзя)
    Attack,
    /// Держать позицию: нулевой heading в этот тик
    HoldGround,
    /// Отступать: инвертированный heading в этот тик
    Retreat,
}

/// Узел дерева: гейт входа + действия + дети в авторском порядке
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub decision: Decision,
    #[serde(default)]
    pub actions: Vec<NodeAction>,
    #[serde(default)]
    pub children: Vec<usize>,
}

/// Авторская модель дерева (RON на диске, см. assets/archetypes/)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDef {
    pub root: usize,
    pub nodes: Vec<TreeNode>,
}

/// Ошибки конфигурации дерева. Fatal при регистрации архетипа:
/// реестр отказывает архетипу целиком, в рантайм такое дерево не попадает.
#[derive(Debug, Error)]
pub enum TreeConfigError {
    #[error("дерево пустое: нет ни одного узла")]
    EmptyTree,

    #[error("root {root} вне диапазона (узлов: {node_count})")]
    RootOutOfBounds { root: usize, node_count: usize },

    #[error("узел {node}: ребёнок {child} вне диапазона (узлов: {node_count})")]
    ChildOutOfBounds {
        node: usize,
        child: usize,
        node_count: usize,
    },

    #[error("узел {node} имеет несколько родителей")]
    MultipleParents { node: usize },

    #[error("root указан как ребёнок узла {parent}")]
    RootHasParent { parent: usize },

    #[error("узел {node} недостижим из root, но имеет детей")]
    UnreachableBranch { node: usize },

    #[error("RON: {0}")]
    Parse(String),
}

/// Неизменяемое валидированное дерево. Строится только через from_def/from_ron.
#[derive(Debug)]
pub struct DecisionTree {
    root: usize,
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Построить и провалидировать дерево из авторской модели
    pub fn from_def(def: TreeDef) -> Result<Self, TreeConfigError> {
        let node_count = def.nodes.len();
        if node_count == 0 {
            return Err(TreeConfigError::EmptyTree);
        }
        if def.root >= node_count {
            return Err(TreeConfigError::RootOutOfBounds {
                root: def.root,
                node_count,
            });
        }

        // Каждый узел — максимум один родитель, root — ни одного.
        // Вместе с проверкой достижимости это исключает циклы по рёбрам.
        let mut has_parent = vec![false; node_count];
        for (id, node) in def.nodes.iter().enumerate() {
            for &child in &node.children {
                if child >= node_count {
                    return Err(TreeConfigError::ChildOutOfBounds {
                        node: id,
                        child,
                        node_count,
                    });
                }
                if child == def.root {
                    return Err(TreeConfigError::RootHasParent { parent: id });
                }
                if has_parent[child] {
                    return Err(TreeConfigError::MultipleParents { node: child });
                }
                has_parent[child] = true;
            }
        }

        // Достижимость из root: недостижимая ветка — ошибка автора,
        // недостижимый лист — допустим (warning, в обход не попадёт)
        let mut reachable = vec![false; node_count];
        reachable[def.root] = true;
        let mut stack = vec![def.root];
        while let Some(id) = stack.pop() {
            for &child in &def.nodes[id].children {
                if !reachable[child] {
                    reachable[child] = true;
                    stack.push(child);
                }
            }
        }
        for (id, node) in def.nodes.iter().enumerate() {
            if !reachable[id] {
                if node.children.is_empty() {
                    logger::log_warning(&format!(
                        "узел {} недостижим из root (лист) — в обход не попадёт",
                        id
                    ));
                } else {
                    return Err(TreeConfigError::UnreachableBranch { node: id });
                }
            }
        }

        Ok(Self {
            root: def.root,
            nodes: def.nodes,
        })
    }

    /// Распарсить RON-текст и построить дерево
    pub fn from_ron(source: &str) -> Result<Self, TreeConfigError> {
        let def: TreeDef =
            ron::from_str(source).map_err(|e| TreeConfigError::Parse(e.to_string()))?;
        Self::from_def(def)
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, id: usize) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Глубина дерева: максимум рёбер от root до листа.
    /// Верхняя граница числа тиков на возврат курсора от корня к любому листу.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, d)) = stack.pop() {
            max_depth = max_depth.max(d);
            for &child in &self.nodes[id].children {
                stack.push((child, d + 1));
            }
        }
        max_depth
    }

    /// Один переход курсора за тик.
    ///
    /// Дети сканируются в авторском порядке, побеждает первый true-гейт.
    /// Ни один не true (или узел — лист) → курсор остаётся на месте.
    /// Поле priority при выборе не участвует.
    pub fn advance<R: Rng>(&self, cursor: usize, ctx: &DecisionContext, rng: &mut R) -> usize {
        for &child in &self.nodes[cursor].children {
            if self.nodes[child].decision.check(ctx, rng) {
                return child;
            }
        }
        cursor
    }

    /// Возврат листа к корню. Применяется ПОСЛЕ выполнения действий тика,
    /// поэтому лист успевает отработать хотя бы один раз и возврат не
    /// стоит отдельного тика.
    pub fn after_actions(&self, cursor: usize) -> usize {
        if self.nodes[cursor].children.is_empty() {
            self.root
        } else {
            cursor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::decision::DecisionKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn node(priority: u8, kind: DecisionKind, children: Vec<usize>) -> TreeNode {
        TreeNode {
            decision: Decision::new(priority, kind),
            actions: Vec::new(),
            children,
        }
    }

    fn always(children: Vec<usize>) -> TreeNode {
        node(0, DecisionKind::Always, children)
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn resolved_ctx(distance: f32) -> DecisionContext {
        DecisionContext {
            target_distance: Some(distance),
            target_resolved: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_node_tree_valid() {
        let tree = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![always(vec![])],
        })
        .unwrap();
        assert_eq!(tree.root(), 0);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_empty_tree_rejected() {
        let err = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, TreeConfigError::EmptyTree));
    }

    #[test]
    fn test_root_out_of_bounds_rejected() {
        let err = DecisionTree::from_def(TreeDef {
            root: 3,
            nodes: vec![always(vec![])],
        })
        .unwrap_err();
        assert!(matches!(err, TreeConfigError::RootOutOfBounds { root: 3, .. }));
    }

    #[test]
    fn test_child_out_of_bounds_rejected() {
        let err = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![always(vec![5])],
        })
        .unwrap_err();
        assert!(matches!(
            err,
            TreeConfigError::ChildOutOfBounds { node: 0, child: 5, .. }
        ));
    }

    #[test]
    fn test_multiple_parents_rejected() {
        // 0 → {1, 2}, 1 → {2}: у узла 2 два родителя
        let err = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![always(vec![1, 2]), always(vec![2]), always(vec![])],
        })
        .unwrap_err();
        assert!(matches!(err, TreeConfigError::MultipleParents { node: 2 }));
    }

    #[test]
    fn test_root_as_child_rejected() {
        let err = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![always(vec![1]), always(vec![0])],
        })
        .unwrap_err();
        assert!(matches!(err, TreeConfigError::RootHasParent { parent: 1 }));
    }

    #[test]
    fn test_unreachable_branch_rejected_but_leaf_tolerated() {
        // Узел 1 недостижим и имеет ребёнка → ошибка
        let err = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![always(vec![]), always(vec![2]), always(vec![])],
        })
        .unwrap_err();
        assert!(matches!(err, TreeConfigError::UnreachableBranch { node: 1 }));

        // Недостижимый ЛИСТ — только warning
        let tree = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![always(vec![]), always(vec![])],
        });
        assert!(tree.is_ok());
    }

    #[test]
    fn test_first_true_child_wins_in_authored_order() {
        // Оба ребёнка true; у первого priority ХУЖЕ (больше).
        // Побеждает всё равно первый в авторском порядке: priority — данные.
        let tree = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![
                always(vec![1, 2]),
                node(5, DecisionKind::Always, vec![]),
                node(0, DecisionKind::Always, vec![]),
            ],
        })
        .unwrap();

        let next = tree.advance(0, &DecisionContext::default(), &mut rng());
        assert_eq!(next, 1);
    }

    #[test]
    fn test_no_true_child_stays_put() {
        let tree = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![
                always(vec![1]),
                node(0, DecisionKind::InRange { min: 0.0, max: 1.0 }, vec![]),
            ],
        })
        .unwrap();

        // Цель не резолвится → InRange false → остаёмся в root
        let next = tree.advance(0, &DecisionContext::default(), &mut rng());
        assert_eq!(next, 0);
    }

    #[test]
    fn test_leaf_returns_to_root_only_after_actions() {
        let tree = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![always(vec![1]), always(vec![])],
        })
        .unwrap();

        // advance лист не трогает (действия ещё должны отработать)
        assert_eq!(tree.advance(1, &DecisionContext::default(), &mut rng()), 1);
        // возврат к корню — отдельная фаза после действий
        assert_eq!(tree.after_actions(1), 0);
        // не-лист after_actions не двигает
        assert_eq!(tree.after_actions(0), 0);
    }

    #[test]
    fn test_leaf_cycle_completes_within_depth_ticks() {
        // root(0) → середина(1) → лист(2), все гейты true
        let tree = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![always(vec![1]), always(vec![2]), always(vec![])],
        })
        .unwrap();
        assert_eq!(tree.depth(), 2);

        let ctx = resolved_ctx(1.0);
        let mut r = rng();

        // Тик листа: действия отработали, курсор вернулся к корню
        let mut cursor = 2;
        cursor = tree.after_actions(tree.advance(cursor, &ctx, &mut r));
        assert_eq!(cursor, 0);

        // Ровно depth тиков до повторного визита листа
        let mut ticks = 0;
        while cursor != 2 && ticks < 100 {
            cursor = tree.advance(cursor, &ctx, &mut r);
            ticks += 1;
        }
        assert_eq!(cursor, 2);
        assert!(ticks <= tree.depth(), "возврат к листу занял {} тиков", ticks);
    }

    #[test]
    fn test_depth_of_branching_tree() {
        let tree = DecisionTree::from_def(TreeDef {
            root: 0,
            nodes: vec![
                always(vec![1, 2]),
                always(vec![]),
                always(vec![3]),
                always(vec![]),
            ],
        })
        .unwrap();
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_from_ron_parses_authored_tree() {
        let source = r#"
(
    root: 0,
    nodes: [
        (decision: (priority: 0, kind: Always), children: [1, 2]),
        (
            decision: (priority: 0, kind: InRange(min: 0.0, max: 2.0)),
            actions: [HoldGround, Attack],
        ),
        (decision: (priority: 1, kind: TargetResolved)),
    ],
)
"#;
        let tree = DecisionTree::from_ron(source).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node(1).actions, vec![NodeAction::HoldGround, NodeAction::Attack]);
        assert_eq!(tree.node(2).children, Vec::<usize>::new());
    }

    #[test]
    fn test_from_ron_rejects_garbage() {
        let err = DecisionTree::from_ron("(root: 0, nodes: [").unwrap_err();
        assert!(matches!(err, TreeConfigError::Parse(_)));
    }
}
