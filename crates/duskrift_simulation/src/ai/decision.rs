//! Decision — boolean-гейт перехода между узлами дерева решений
//!
//! Закрытый enum вместо подклассов: новые условия добавляются вариантом,
//! авторский контент (RON) получает их бесплатно через serde.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Снимок состояния агента для оценки гейтов. Собирается per-agent каждый тик.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext {
    pub agent_position: Vec3,
    /// Дистанция до цели; None = цель в этот тик не резолвится
    pub target_distance: Option<f32>,
    pub target_resolved: bool,
    /// Доли в [0.0, 1.0]; 1.0 когда компонент у агента отсутствует
    pub health_fraction: f32,
    pub stamina_fraction: f32,
}

impl Default for DecisionContext {
    fn default() -> Self {
        Self {
            agent_position: Vec3::ZERO,
            target_distance: None,
            target_resolved: false,
            health_fraction: 1.0,
            stamina_fraction: 1.0,
        }
    }
}

/// Гейт перехода с авторской подсказкой старшинства
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Меньше = важнее. Обход дерева поле НЕ консультирует: побеждает первый
    /// true-ребёнок в авторском порядке. Поле сохранено как данные, см.
    /// docs/decisions/ADR-002-authored-order-traversal.md
    pub priority: u8,
    pub kind: DecisionKind,
}

/// Закрытый набор условий перехода
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecisionKind {
    /// Безусловный переход
    Always,
    /// min ≤ дистанция ≤ max, обе границы включительно. Без цели — false.
    InRange { min: f32, max: f32 },
    /// Цель резолвится в этот тик
    TargetResolved,
    /// Доля здоровья строго ниже порога
    HealthBelow { fraction: f32 },
    /// Доля выносливости строго ниже порога
    StaminaBelow { fraction: f32 },
    /// Вероятностный гейт из seeded RNG симуляции (детерминизм при fixed seed)
    Chance { odds: f32 },
}

impl Decision {
    pub fn new(priority: u8, kind: DecisionKind) -> Self {
        Self { priority, kind }
    }

    /// Оценка гейта. Side-effect-free (кроме потребления RNG-потока в Chance).
    pub fn check<R: Rng>(&self, ctx: &DecisionContext, rng: &mut R) -> bool {
        match self.kind {
            DecisionKind::Always => true,
            DecisionKind::InRange { min, max } => match ctx.target_distance {
                Some(distance) => distance >= min && distance <= max,
                None => false,
            },
            DecisionKind::TargetResolved => ctx.target_resolved,
            DecisionKind::HealthBelow { fraction } => ctx.health_fraction < fraction,
            DecisionKind::StaminaBelow { fraction } => ctx.stamina_fraction < fraction,
            DecisionKind::Chance { odds } => rng.gen::<f32>() < odds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx_at_distance(distance: f32) -> DecisionContext {
        DecisionContext {
            target_distance: Some(distance),
            target_resolved: true,
            ..Default::default()
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_in_range_boundaries_inclusive() {
        let gate = Decision::new(0, DecisionKind::InRange { min: 2.0, max: 10.0 });
        let eps = 0.001;

        // Обе границы включительно
        assert!(gate.check(&ctx_at_distance(2.0), &mut rng()));
        assert!(gate.check(&ctx_at_distance(10.0), &mut rng()));
        assert!(gate.check(&ctx_at_distance(5.0), &mut rng()));

        // Чуть снаружи — false
        assert!(!gate.check(&ctx_at_distance(2.0 - eps), &mut rng()));
        assert!(!gate.check(&ctx_at_distance(10.0 + eps), &mut rng()));
    }

    #[test]
    fn test_in_range_false_without_resolved_target() {
        let gate = Decision::new(0, DecisionKind::InRange { min: 0.0, max: 1000.0 });
        let ctx = DecisionContext::default(); // target_distance: None
        assert!(!gate.check(&ctx, &mut rng()));
    }

    #[test]
    fn test_target_resolved_gate() {
        let gate = Decision::new(0, DecisionKind::TargetResolved);
        assert!(gate.check(&ctx_at_distance(1.0), &mut rng()));
        assert!(!gate.check(&DecisionContext::default(), &mut rng()));
    }

    #[test]
    fn test_health_below_is_strict() {
        let gate = Decision::new(0, DecisionKind::HealthBelow { fraction: 0.25 });

        let mut ctx = DecisionContext::default();
        ctx.health_fraction = 0.25;
        assert!(!gate.check(&ctx, &mut rng())); // Ровно на пороге — ещё не отступаем

        ctx.health_fraction = 0.24;
        assert!(gate.check(&ctx, &mut rng()));
    }

    #[test]
    fn test_chance_extremes() {
        let ctx = DecisionContext::default();
        let never = Decision::new(0, DecisionKind::Chance { odds: 0.0 });
        let always = Decision::new(0, DecisionKind::Chance { odds: 1.0 });

        let mut r = rng();
        for _ in 0..100 {
            assert!(!never.check(&ctx, &mut r));
            assert!(always.check(&ctx, &mut r)); // gen::<f32>() ∈ [0, 1)
        }
    }
}
