//! AI decision-making module
//!
//! DecisionPolicy с тремя вариантами (FighterBrain):
//! - Human: InputSnapshot → intents
//! - Ai: 4-stage pipeline (reactive → proactive → positioning → deliberate)
//! - Boss: Ai + rage/ability overlay (композиция, не наследование)

use bevy::prelude::*;

pub mod boss;
pub mod controller;
pub mod difficulty;
pub mod events;
pub mod policy;
pub mod systems;

#[cfg(test)]
mod controller_tests;

// Re-export основных типов
pub use boss::{BossController, RAGE_DAMAGE_MULTIPLIER, RAGE_REGEN_MULTIPLIER, RAGE_SPEED_MULTIPLIER};
pub use controller::{AiController, BehaviorState, ComboPlan, AI_BLOCK_COOLDOWN, AI_BLOCK_DURATION};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use events::{BossAbilityUsed, RageTriggered};
pub use policy::{
    DecisionContext, DecisionPolicy, FighterBrain, HumanPolicy, OpponentView,
    HUMAN_BLOCK_COOLDOWN, HUMAN_BLOCK_DURATION,
};

use crate::FightSet;

/// AI Plugin
///
/// Регистрирует decide_actions в FightSet::Decide (до tick бойцов).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RageTriggered>()
            .add_event::<BossAbilityUsed>()
            .add_systems(FixedUpdate, systems::decide_actions.in_set(FightSet::Decide));
    }
}
