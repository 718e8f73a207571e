//! Hitbox geometry для ударов
//!
//! Hitbox — прямоугольник перед телом бойца: начинается чуть внутри
//! ведущего края тела и тянется наружу на `range` атаки.
//! Hurtbox — просто bounding rect тела (`Body::rect`).

use bevy::math::Rect;

use crate::combat::AttackKind;
use crate::components::{Body, Facing};

/// How far the hitbox starts inside the body's leading edge.
pub const HITBOX_INSET: f32 = 25.0;

pub fn hitbox_rect(body: &Body, kind: AttackKind, range: f32) -> Rect {
    let top = body.center().y + kind.hitbox_top_offset();
    let left = match body.facing {
        Facing::Right => body.position.x + body.size.x - HITBOX_INSET,
        Facing::Left => body.position.x - range + HITBOX_INSET,
    };

    Rect::new(left, top, left + range, top + kind.hitbox_height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;

    #[test]
    fn test_hitbox_facing_right() {
        let arena = ArenaConfig::default();
        let body = Body::standing(100.0, &arena); // x ∈ [100,160], y ∈ [440,550]

        let rect = hitbox_rect(&body, AttackKind::Punch, 50.0);
        assert_eq!(rect.min.x, 135.0);
        assert_eq!(rect.max.x, 185.0);
        assert_eq!(rect.min.y, 495.0 - 15.0);
        assert_eq!(rect.height(), 20.0);
    }

    #[test]
    fn test_hitbox_facing_left_mirrors() {
        let arena = ArenaConfig::default();
        let mut body = Body::standing(100.0, &arena);
        body.facing = Facing::Left;

        let rect = hitbox_rect(&body, AttackKind::Ultimate, 110.0);
        assert_eq!(rect.max.x, 125.0);
        assert_eq!(rect.min.x, 15.0);
        assert_eq!(rect.min.y, 485.0);
        assert_eq!(rect.height(), 30.0);
    }
}
