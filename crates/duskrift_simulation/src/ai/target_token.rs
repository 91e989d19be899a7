//! TargetToken — ленивый handle цели: точка мира или живой entity
//!
//! Токен НЕ кэширует позицию: резолв происходит на каждом запросе через
//! read-only lookup. Despawned referent — это обычный None ("не резолвится"),
//! никогда не dangling-указатель и не ошибка.

use bevy::prelude::*;

/// Immutable handle цели. Copy-значение, живёт один тик в ResolvedTarget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetToken {
    /// Фиксированная точка мира (резолвится всегда)
    Point { point: Vec3 },
    /// Живой referent (резолвится пока entity существует в мире)
    Dynamic { target: Entity },
}

impl TargetToken {
    pub fn point(point: Vec3) -> Self {
        Self::Point { point }
    }

    pub fn dynamic(target: Entity) -> Self {
        Self::Dynamic { target }
    }

    /// Ленивый резолв текущей позиции цели
    ///
    /// `lookup` — доступ к позициям живых entity (обычно замыкание над
    /// `Query<&Transform>`). None = цель в этот тик не резолвится.
    pub fn resolve<F>(&self, lookup: F) -> Option<Vec3>
    where
        F: Fn(Entity) -> Option<Vec3>,
    {
        match self {
            TargetToken::Point { point } => Some(*point),
            TargetToken::Dynamic { target } => lookup(*target),
        }
    }

    /// Нормализованное направление от `from` к цели
    ///
    /// ZERO когда цель не резолвится или совпадает с `from` — оба случая
    /// означают "стоять на месте".
    pub fn heading_from<F>(&self, from: Vec3, lookup: F) -> Vec3
    where
        F: Fn(Entity) -> Option<Vec3>,
    {
        match self.resolve(lookup) {
            Some(position) => (position - from).normalize_or_zero(),
            None => Vec3::ZERO,
        }
    }

    /// Идентичность цели для change-detection перепланирования
    ///
    /// Две точки мира — один referent (материальность смены меряется
    /// расстоянием); два entity — referent совпадает только при равенстве id.
    pub fn same_referent(&self, other: &TargetToken) -> bool {
        match (self, other) {
            (TargetToken::Point { .. }, TargetToken::Point { .. }) => true,
            (TargetToken::Dynamic { target: a }, TargetToken::Dynamic { target: b }) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_token_resolves_without_lookup() {
        let token = TargetToken::point(Vec3::new(3.0, 0.0, -4.0));
        let resolved = token.resolve(|_| None);
        assert_eq!(resolved, Some(Vec3::new(3.0, 0.0, -4.0)));
    }

    #[test]
    fn test_dynamic_token_unresolved_when_referent_gone() {
        let token = TargetToken::dynamic(Entity::from_raw(7));
        assert_eq!(token.resolve(|_| None), None);
        assert_eq!(token.heading_from(Vec3::ZERO, |_| None), Vec3::ZERO);
    }

    #[test]
    fn test_heading_is_unit_vector_toward_target() {
        let from = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(4.0, -2.0, 15.0);
        let token = TargetToken::point(target);

        let heading = token.heading_from(from, |_| None);
        let expected = (target - from).normalize();

        assert!((heading - expected).length() < 1e-6);
        assert!((heading.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_at_own_position_is_zero() {
        let at = Vec3::new(5.0, 0.0, 5.0);
        let token = TargetToken::point(at);
        assert_eq!(token.heading_from(at, |_| None), Vec3::ZERO);
    }

    #[test]
    fn test_same_referent_rules() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        let p1 = TargetToken::point(Vec3::ZERO);
        let p2 = TargetToken::point(Vec3::new(100.0, 0.0, 0.0));
        let d1 = TargetToken::dynamic(a);
        let d2 = TargetToken::dynamic(b);

        // Точки мира — один referent: материальность решает расстояние
        assert!(p1.same_referent(&p2));
        // Entity совпадает только сам с собой
        assert!(d1.same_referent(&d1));
        assert!(!d1.same_referent(&d2));
        // Смена вида цели — всегда новый referent
        assert!(!p1.same_referent(&d1));
    }
}
