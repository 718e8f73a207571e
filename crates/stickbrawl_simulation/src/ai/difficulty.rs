//! AI difficulty profiles.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::FighterStats;
use crate::config::AttackTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

/// Decision-layer tuning fixed by a difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DifficultyProfile {
    /// Frames between deliberate decisions (lower = faster).
    pub reaction_time: u32,
    /// Probability a planned attack actually executes.
    pub accuracy: f32,
    pub aggressiveness: f32,
    pub block_chance: f32,
    pub combo_chance: f32,
    pub attack_frequency: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Nightmare,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Nightmare => "nightmare",
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        let (reaction_time, accuracy, aggressiveness, block_chance, combo_chance, attack_frequency) =
            match self {
                Difficulty::Easy => (35, 0.7, 0.6, 0.3, 0.2, 0.4),
                Difficulty::Normal => (25, 0.8, 0.75, 0.45, 0.4, 0.6),
                Difficulty::Hard => (15, 0.9, 0.85, 0.65, 0.6, 0.8),
                Difficulty::Nightmare => (8, 0.95, 0.95, 0.8, 0.8, 0.9),
            };

        DifficultyProfile {
            reaction_time,
            accuracy,
            aggressiveness,
            block_chance,
            combo_chance,
            attack_frequency,
        }
    }

    pub fn dodge_chance(&self) -> f32 {
        match self {
            Difficulty::Hard | Difficulty::Nightmare => 0.6,
            Difficulty::Easy | Difficulty::Normal => 0.4,
        }
    }

    /// Hard и Nightmare перезаписывают статы архетипа напрямую.
    pub fn apply_overrides(&self, stats: &mut FighterStats) {
        match self {
            Difficulty::Easy | Difficulty::Normal => {}
            Difficulty::Hard => {
                stats.max_health = 120;
                stats.speed = 6.0;
            }
            Difficulty::Nightmare => {
                stats.max_health = 150;
                stats.speed = 7.0;
                stats.damage = AttackTable::new(12, 18, 25, 40);
                stats.energy_regen = 0.6;
            }
        }
    }
}
