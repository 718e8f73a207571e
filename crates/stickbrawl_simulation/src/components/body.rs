//! Side-view kinematic body (screen coordinates, y grows downward).

use bevy::math::Rect;
use bevy::prelude::*;

use crate::config::ArenaConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Kinematic контроллер бойца
///
/// `position` = верхний левый угол тела. Gravity/ground/bounds — без физ. движка:
/// арена плоская, земля — горизонтальная линия.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
}

impl Body {
    /// Body standing on the ground line with its left edge at `x`.
    pub fn standing(x: f32, arena: &ArenaConfig) -> Self {
        let size = Vec2::new(arena.body_width, arena.body_height);
        Self {
            position: Vec2::new(x, arena.ground_y() - size.y),
            velocity: Vec2::ZERO,
            size,
            facing: Facing::Right,
            on_ground: true,
        }
    }

    /// Hurtbox.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.position, self.position + self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn center_x(&self) -> f32 {
        self.position.x + self.size.x * 0.5
    }

    pub fn set_center_x(&mut self, x: f32) {
        self.position.x = x - self.size.x * 0.5;
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// Launches upward; no-op while airborne.
    pub fn jump(&mut self, strength: f32) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity.y = strength;
        self.on_ground = false;
        true
    }

    /// One frame of gravity + integration + ground/bounds resolution.
    pub fn integrate(&mut self, arena: &ArenaConfig) {
        self.velocity.y = (self.velocity.y + arena.gravity).min(arena.terminal_velocity);
        self.position += self.velocity;

        let ground = arena.ground_y();
        if self.bottom() >= ground {
            self.position.y = ground - self.size.y;
            self.velocity.y = 0.0;
            self.on_ground = true;
        }

        self.clamp_to_arena(arena);
    }

    pub fn clamp_to_arena(&mut self, arena: &ArenaConfig) {
        let max_x = (arena.screen_width - self.size.x).max(0.0);
        self.position.x = self.position.x.clamp(0.0, max_x);
        // Потолок экрана
        self.position.y = self.position.y.max(0.0);
    }
}

/// Strict overlap (touching edges do not count).
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}
