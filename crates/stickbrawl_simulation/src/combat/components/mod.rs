//! Combat components.

pub mod attack;
pub mod combatant;
pub mod stats;

#[cfg(test)]
mod combatant_tests;

pub use attack::{AttackKind, AttackPhase, AttackState};
pub use combatant::{Combatant, ComboTracker, Guard};
pub use stats::{effect_totals, FighterStats, MAX_EQUIPPED_DAMAGE_REDUCTION};
