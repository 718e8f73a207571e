//! DecisionPolicy — кто решает за бойца: человек, AI или босс.
//!
//! Политика читает только read-only вид оппонента и свой Combatant, а пишет
//! intents (move direction, attack, block, jump) через методы Combatant.
//! Урон политика не наносит никогда.

use bevy::prelude::*;
use rand::RngCore;

use super::boss::BossController;
use super::controller::AiController;
use crate::combat::{AttackKind, Combatant};
use crate::input::InputSnapshot;

pub const HUMAN_BLOCK_DURATION: u32 = 30;
pub const HUMAN_BLOCK_COOLDOWN: u32 = 60;

/// Snapshot of the opponent taken before any policy runs this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentView {
    pub center_x: f32,
    pub health_ratio: f32,
    pub is_attacking: bool,
    pub is_alive: bool,
}

impl OpponentView {
    pub fn of(combatant: &Combatant) -> Self {
        Self {
            center_x: combatant.center_x(),
            health_ratio: combatant.health_ratio(),
            is_attacking: combatant.is_attacking(),
            is_alive: combatant.is_alive(),
        }
    }
}

pub struct DecisionContext<'a> {
    pub opponent: &'a OpponentView,
    /// This frame's input; only human policies read it.
    pub input: Option<&'a InputSnapshot>,
    pub rng: &'a mut dyn RngCore,
}

/// Per-frame intent producer.
pub trait DecisionPolicy {
    fn decide(&mut self, me: &mut Combatant, ctx: &mut DecisionContext<'_>);
}

// ============================================================================
// Human
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HumanPolicy;

impl DecisionPolicy for HumanPolicy {
    fn decide(&mut self, me: &mut Combatant, ctx: &mut DecisionContext<'_>) {
        let Some(input) = ctx.input else {
            me.set_move_direction(0);
            return;
        };

        me.set_move_direction(input.horizontal());
        match input.horizontal() {
            1 => me.face(crate::components::Facing::Right),
            -1 => me.face(crate::components::Facing::Left),
            _ => {}
        }

        if input.jump {
            me.jump(1.0);
        }
        if input.block {
            me.try_block(HUMAN_BLOCK_DURATION, HUMAN_BLOCK_COOLDOWN);
        }

        // Одна атака за кадр, приоритет по порядку
        let pressed = [
            (input.punch, AttackKind::Punch),
            (input.kick, AttackKind::Kick),
            (input.special, AttackKind::Special),
            (input.ultimate, AttackKind::Ultimate),
        ];
        if let Some((_, kind)) = pressed.into_iter().find(|(held, kind)| *held && me.can_attack(*kind)) {
            me.attempt_attack(kind);
        }
    }
}

impl DecisionPolicy for AiController {
    fn decide(&mut self, me: &mut Combatant, ctx: &mut DecisionContext<'_>) {
        self.update(me, ctx.opponent, &mut *ctx.rng);
    }
}

impl DecisionPolicy for BossController {
    fn decide(&mut self, me: &mut Combatant, ctx: &mut DecisionContext<'_>) {
        self.update(me, ctx.opponent, &mut *ctx.rng);
    }
}

// ============================================================================
// FighterBrain component
// ============================================================================

/// Decision policy attached to a fighter entity.
#[derive(Component, Debug, Clone)]
pub enum FighterBrain {
    Human(HumanPolicy),
    Ai(AiController),
    Boss(Box<BossController>),
}

impl FighterBrain {
    pub fn policy_mut(&mut self) -> &mut dyn DecisionPolicy {
        match self {
            FighterBrain::Human(policy) => policy,
            FighterBrain::Ai(controller) => controller,
            FighterBrain::Boss(boss) => &mut **boss,
        }
    }

    pub fn as_ai(&self) -> Option<&AiController> {
        match self {
            FighterBrain::Human(_) => None,
            FighterBrain::Ai(controller) => Some(controller),
            FighterBrain::Boss(boss) => Some(&boss.ai),
        }
    }

    pub fn as_boss(&self) -> Option<&BossController> {
        match self {
            FighterBrain::Boss(boss) => Some(boss),
            _ => None,
        }
    }
}
