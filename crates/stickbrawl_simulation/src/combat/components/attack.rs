//! Attack kinds and the per-swing state machine.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::audio::SoundCue;

// ============================================================================
// Attack Kind
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub enum AttackKind {
    Punch,
    Kick,
    Special,
    Ultimate,
}

impl AttackKind {
    pub const ALL: [AttackKind; 4] = [
        AttackKind::Punch,
        AttackKind::Kick,
        AttackKind::Special,
        AttackKind::Ultimate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttackKind::Punch => "punch",
            AttackKind::Kick => "kick",
            AttackKind::Special => "special",
            AttackKind::Ultimate => "ultimate",
        }
    }

    pub fn energy_cost(&self) -> f32 {
        match self {
            AttackKind::Punch => 0.0,
            AttackKind::Kick => 5.0,
            AttackKind::Special => 30.0,
            AttackKind::Ultimate => 70.0,
        }
    }

    /// Total swing length in frames.
    pub fn duration(&self) -> u32 {
        match self {
            AttackKind::Punch => 15,
            AttackKind::Kick => 20,
            AttackKind::Special => 25,
            AttackKind::Ultimate => 40,
        }
    }

    /// Frames `[start, end)` during which the hitbox exists.
    pub fn active_window(&self) -> (u32, u32) {
        match self {
            AttackKind::Punch => (3, 11),
            AttackKind::Kick => (4, 14),
            AttackKind::Special => (5, 18),
            AttackKind::Ultimate => (8, 30),
        }
    }

    /// Horizontal push applied to the defender.
    pub fn knockback(&self) -> f32 {
        match self {
            AttackKind::Punch => 8.0,
            AttackKind::Kick => 12.0,
            AttackKind::Special => 20.0,
            AttackKind::Ultimate => 30.0,
        }
    }

    /// Upward impulse on hit (heavy attacks only).
    pub fn launch_velocity(&self) -> Option<f32> {
        match self {
            AttackKind::Special | AttackKind::Ultimate => Some(-5.0),
            _ => None,
        }
    }

    pub fn hitbox_height(&self) -> f32 {
        match self {
            AttackKind::Special | AttackKind::Ultimate => 30.0,
            _ => 20.0,
        }
    }

    /// Hitbox top relative to body center.
    pub fn hitbox_top_offset(&self) -> f32 {
        match self {
            AttackKind::Punch => -15.0,
            _ => -10.0,
        }
    }

    pub fn sound(&self) -> SoundCue {
        match self {
            AttackKind::Punch => SoundCue::Punch,
            AttackKind::Kick => SoundCue::Kick,
            AttackKind::Special => SoundCue::Special,
            AttackKind::Ultimate => SoundCue::Ultimate,
        }
    }
}

// ============================================================================
// Attack State
// ============================================================================

/// Swing phases (windup → active → recovery), derived from the frame counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackPhase {
    /// Telegraph, hitbox off (opponent AI can react)
    Windup,
    /// Hitbox on
    Active,
    /// Hitbox off, swing still locks the fighter
    Recovery,
}

/// One attack in progress. `frame` counts up from 0 to `kind.duration()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct AttackState {
    pub kind: AttackKind,
    pub frame: u32,
}

impl AttackState {
    pub fn new(kind: AttackKind) -> Self {
        Self { kind, frame: 0 }
    }

    pub fn phase(&self) -> AttackPhase {
        let (start, end) = self.kind.active_window();
        if self.frame < start {
            AttackPhase::Windup
        } else if self.frame < end {
            AttackPhase::Active
        } else {
            AttackPhase::Recovery
        }
    }

    pub fn is_hitbox_active(&self) -> bool {
        self.phase() == AttackPhase::Active
    }

    /// Advances one frame. Returns `false` once the swing is over.
    pub fn advance(&mut self) -> bool {
        self.frame += 1;
        self.frame < self.kind.duration()
    }
}
