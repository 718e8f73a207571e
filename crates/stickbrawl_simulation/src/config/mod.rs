//! Static game data and arena tuning.
//!
//! - arena: screen/physics constants (`ArenaConfig` resource)
//! - archetypes: character + boss stat tables (`ArchetypeRegistry`)
//! - equipment: shop items and their stat effects (`EquipmentCatalog`)
//!
//! Всё грузится один раз при старте и валидируется сразу, чтобы битый конфиг
//! падал на загрузке, а не посреди матча.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod archetypes;
pub mod equipment;

pub use archetypes::{
    ArchetypeRegistry, AttackTable, BossAbility, BossArchetype, CharacterArchetype, Rgb,
};
pub use equipment::{EffectKind, EquipmentCatalog, EquipmentItem};

/// Configuration lookup/validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown character archetype `{0}`")]
    UnknownArchetype(String),

    #[error("unknown boss `{0}`")]
    UnknownBoss(String),

    #[error("unknown equipment item `{0}`")]
    UnknownEquipment(String),

    #[error("invalid stat `{field}` for `{id}`: {reason}")]
    InvalidStat {
        id: String,
        field: String,
        reason: String,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// How several equipped items of the same effect category combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum StackingRule {
    /// Multipliers of one category multiply together.
    #[default]
    Multiplicative,
    /// Only the last item of a category (in id order) applies.
    LastWins,
}

/// Arena geometry and physics tuning (frame-based units).
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Distance from the bottom of the screen to the ground line.
    pub ground_offset: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    /// Negative = upward (screen coordinates, y grows down).
    pub jump_strength: f32,
    pub body_width: f32,
    pub body_height: f32,
    pub max_energy: f32,
    /// Frames a combo stays alive after a hit.
    pub combo_window: u32,
    pub hit_invulnerability: u32,
    pub block_invulnerability: u32,
    /// Horizontal speed factor while blocking.
    pub block_speed_factor: f32,
    /// Spawn distance from the left/right screen edge.
    pub spawn_margin: f32,
    pub equipment_stacking: StackingRule,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            ground_offset: 50.0,
            gravity: 0.8,
            terminal_velocity: 15.0,
            jump_strength: -18.0,
            body_width: 60.0,
            body_height: 110.0,
            max_energy: 100.0,
            combo_window: 120,
            hit_invulnerability: 20,
            block_invulnerability: 10,
            block_speed_factor: 0.3,
            spawn_margin: 150.0,
            equipment_stacking: StackingRule::Multiplicative,
        }
    }
}

impl ArenaConfig {
    pub fn ground_y(&self) -> f32 {
        self.screen_height - self.ground_offset
    }

    /// Parses a (possibly partial) RON document; missing fields keep defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        report_rejected("arena", parse_arena(text))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
            ("body_width", self.body_width),
            ("body_height", self.body_height),
            ("max_energy", self.max_energy),
        ];
        for (field, value) in positive {
            ensure_positive("arena", field, value)?;
        }

        if self.jump_strength >= 0.0 {
            return Err(invalid("arena", "jump_strength", "must be negative (upward)"));
        }
        if self.ground_y() <= self.body_height {
            return Err(invalid("arena", "ground_offset", "ground line leaves no room for a body"));
        }
        if !(0.0..=1.0).contains(&self.block_speed_factor) {
            return Err(invalid("arena", "block_speed_factor", "must be within [0, 1]"));
        }
        Ok(())
    }
}

fn parse_arena(text: &str) -> Result<ArenaConfig, ConfigError> {
    let config: ArenaConfig = ron::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Logs a rejected config document and passes the error through.
pub(crate) fn report_rejected<T>(what: &str, result: Result<T, ConfigError>) -> Result<T, ConfigError> {
    if let Err(err) = &result {
        crate::logger::log_error(&format!("❌ {} config rejected: {}", what, err));
    }
    result
}

pub(crate) fn invalid(id: &str, field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidStat {
        id: id.to_string(),
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

pub(crate) fn ensure_positive(id: &str, field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(id, field, &format!("must be positive, got {}", value)))
    }
}

/// `floor(value × factor)` with a small epsilon, so that f32 noise
/// (`20 × 1.3 = 25.999998`) does not drop a whole point.
pub fn scale_truncated(value: f32, factor: f32) -> f32 {
    ((value as f64) * (factor as f64) + 1e-4).floor() as f32
}

/// Integer flavour of [`scale_truncated`].
pub fn scale_truncated_u32(value: u32, factor: f32) -> u32 {
    scale_truncated(value as f32, factor).max(0.0) as u32
}
