//! AI decision layer для бойца.
//!
//! Per-tick pipeline (фиксированный порядок):
//! 1. Reactive — block/dodge на атаку оппонента, каждый кадр
//! 2. Proactive — urgency scoring → конкретная атака
//! 3. Positioning — pursue / back off / hold
//! 4. Deliberate — bias движения по behavior state, смена state по таймеру
//!
//! Stage 4 bias применяется только когда stage 3 "держит позицию".

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::difficulty::{Difficulty, DifficultyProfile};
use super::policy::OpponentView;
use crate::combat::{AttackKind, Combatant};
use crate::components::Facing;

// ============================================================================
// Tuning
// ============================================================================

pub const AI_BLOCK_DURATION: u32 = 25;
pub const AI_BLOCK_COOLDOWN: u32 = 40;

const BLOCK_REACT_DISTANCE: f32 = 90.0;
const DODGE_REACT_DISTANCE: f32 = 70.0;
const DODGE_COOLDOWN: u32 = 25;
/// First frames of the dodge window spent retreating.
const DODGE_RETREAT_FRAMES: u32 = 10;
const DODGE_JUMP_CHANCE: f32 = 0.7;
const DODGE_JUMP_SCALE: f32 = 0.8;

const PURSUIT_FRAMES: u32 = 60;
const DRIFT_CHANCE: f32 = 0.3;

const JUMP_IN_CHANCE: f32 = 0.15;
const JUMP_IN_SCALE: f32 = 0.9;

const ATTACK_REFRACTORY: std::ops::RangeInclusive<u32> = 10..=25;

// ============================================================================
// Behavior state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BehaviorState {
    Aggressive,
    Defensive,
    Combo,
}

/// Queued attack sequence for the combo behavior.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComboPlan {
    pub sequence: Vec<AttackKind>,
    pub cursor: usize,
}

impl ComboPlan {
    /// Sequence sized to the energy budget.
    pub fn for_energy(energy: f32) -> Self {
        use AttackKind::*;

        let sequence = if energy >= Ultimate.energy_cost() {
            vec![Punch, Kick, Special, Ultimate]
        } else if energy >= Special.energy_cost() {
            vec![Punch, Kick, Special]
        } else {
            vec![Punch, Kick, Punch, Kick]
        };
        Self { sequence, cursor: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.sequence.len()
    }

    /// Skips entries the fighter cannot pay for; returns the next affordable one
    /// without consuming it.
    fn next_affordable(&mut self, energy: f32) -> Option<AttackKind> {
        while let Some(kind) = self.sequence.get(self.cursor).copied() {
            if energy >= kind.energy_cost() {
                return Some(kind);
            }
            self.cursor += 1;
        }
        None
    }
}

/// Stage 3 verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Positioning {
    /// Attacking or blocking: stand still.
    Freeze,
    Move(i8),
    /// No preference; deliberate bias or drift decides.
    Hold,
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug, Clone)]
pub struct AiController {
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub behavior: BehaviorState,
    pub state_timer: u32,
    pub decision_timer: u32,
    pub pursuit_timer: u32,
    pub attack_timer: u32,
    pub dodge_timer: u32,
    pub consecutive_attacks: u32,
    pub combo: Option<ComboPlan>,
    /// Direction chosen by the last deliberate decision.
    pub movement_bias: i8,
}

impl AiController {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            profile: difficulty.profile(),
            behavior: BehaviorState::Aggressive,
            state_timer: 0,
            decision_timer: 0,
            pursuit_timer: 0,
            attack_timer: 0,
            dodge_timer: 0,
            consecutive_attacks: 0,
            combo: None,
            movement_bias: 0,
        }
    }

    /// Runs the full pipeline for one frame and leaves intents on `me`.
    pub fn update(&mut self, me: &mut Combatant, opponent: &OpponentView, rng: &mut dyn RngCore) {
        if !me.is_alive() || !opponent.is_alive {
            me.set_move_direction(0);
            return;
        }

        self.tick_timers();

        let offset = opponent.center_x - me.center_x();
        let distance = offset.abs();
        let toward: i8 = if offset > 0.0 { 1 } else { -1 };
        me.face(if toward > 0 { Facing::Right } else { Facing::Left });

        self.react(me, opponent, distance, rng);
        self.score_attack(me, opponent, distance, rng);
        let positioning = self.position(me, opponent, distance, toward);
        self.deliberate(me, opponent, distance, toward, rng);

        let direction = match positioning {
            Positioning::Freeze => 0,
            _ if self.is_dodge_retreating() => -toward,
            Positioning::Move(direction) => direction,
            Positioning::Hold if self.movement_bias != 0 => self.movement_bias,
            Positioning::Hold => {
                if rng.gen::<f32>() < DRIFT_CHANCE {
                    *[-1, 1, 0].choose(rng).unwrap_or(&0)
                } else {
                    0
                }
            }
        };
        me.set_move_direction(direction);
    }

    fn tick_timers(&mut self) {
        self.state_timer = self.state_timer.saturating_sub(1);
        self.attack_timer = self.attack_timer.saturating_sub(1);
        self.pursuit_timer = self.pursuit_timer.saturating_sub(1);
        self.dodge_timer = self.dodge_timer.saturating_sub(1);
    }

    fn is_dodge_retreating(&self) -> bool {
        self.dodge_timer > DODGE_COOLDOWN - DODGE_RETREAT_FRAMES
    }

    // ------------------------------------------------------------------------
    // 1. Reactive
    // ------------------------------------------------------------------------

    fn react(
        &mut self,
        me: &mut Combatant,
        opponent: &OpponentView,
        distance: f32,
        rng: &mut dyn RngCore,
    ) {
        if !opponent.is_attacking {
            return;
        }

        if distance < BLOCK_REACT_DISTANCE {
            let mut chance = self.profile.block_chance;
            // Добиваем, а не блокируем
            if opponent.health_ratio < 0.3 {
                chance *= 0.5;
            }
            if rng.gen::<f32>() < chance && me.guard.is_available() {
                me.try_block(AI_BLOCK_DURATION, AI_BLOCK_COOLDOWN);
            }
        }

        if distance < DODGE_REACT_DISTANCE
            && self.dodge_timer == 0
            && rng.gen::<f32>() < self.difficulty.dodge_chance()
        {
            self.dodge_timer = DODGE_COOLDOWN;
            if me.body.on_ground && rng.gen::<f32>() < DODGE_JUMP_CHANCE {
                me.jump(DODGE_JUMP_SCALE);
            }
        }
    }

    // ------------------------------------------------------------------------
    // 2. Proactive attack scoring
    // ------------------------------------------------------------------------

    /// Additive urgency; probability = urgency × frequency × aggressiveness.
    pub fn attack_urgency(&self, me: &Combatant, opponent: &OpponentView, distance: f32) -> f32 {
        let range = &me.stats.range;
        let mut urgency = 0.0;

        if distance <= range[AttackKind::Punch] {
            urgency += 0.8;
        } else if distance <= range[AttackKind::Kick] {
            urgency += 0.6;
        } else if distance <= range[AttackKind::Special] {
            urgency += 0.4;
        }

        if opponent.health_ratio < 0.5 {
            urgency += 0.3;
        }
        if opponent.health_ratio < 0.3 {
            urgency += 0.4;
        }
        if me.health_ratio() < 0.4 {
            urgency += 0.2;
        }
        if self.consecutive_attacks > 0 {
            urgency += 0.2;
        }

        urgency
    }

    fn score_attack(
        &mut self,
        me: &mut Combatant,
        opponent: &OpponentView,
        distance: f32,
        rng: &mut dyn RngCore,
    ) {
        let can_attack = !me.is_attacking()
            && !me.is_blocking()
            && me.has_ready_attack()
            && self.attack_timer == 0;
        if !can_attack {
            return;
        }

        let chance = self.attack_urgency(me, opponent, distance)
            * self.profile.attack_frequency
            * self.profile.aggressiveness;
        if rng.gen::<f32>() >= chance {
            return;
        }

        if rng.gen::<f32>() < self.profile.accuracy {
            if let Some(kind) = self.choose_attack(me, opponent, distance, rng) {
                if me.attempt_attack(kind) {
                    self.consecutive_attacks += 1;
                    self.advance_combo(kind);
                }
            }
        }
        self.attack_timer = rng.gen_range(ATTACK_REFRACTORY);
    }

    /// Picks an attack kind the fighter can currently pay for.
    fn choose_attack(
        &mut self,
        me: &Combatant,
        opponent: &OpponentView,
        distance: f32,
        rng: &mut dyn RngCore,
    ) -> Option<AttackKind> {
        let energy = me.energy.current;
        let range = &me.stats.range;
        let affordable = |kind: AttackKind| energy >= kind.energy_cost();

        if distance <= range[AttackKind::Punch] {
            if self.behavior == BehaviorState::Combo {
                if let Some(kind) = self.combo_step(energy) {
                    return Some(kind);
                }
            }

            if opponent.health_ratio < 0.2 && affordable(AttackKind::Ultimate) {
                Some(AttackKind::Ultimate)
            } else if affordable(AttackKind::Special) && rng.gen::<f32>() < 0.4 {
                Some(AttackKind::Special)
            } else if rng.gen::<f32>() < 0.7 {
                Some(AttackKind::Punch)
            } else {
                Some(AttackKind::Kick).filter(|kind| affordable(*kind))
            }
        } else if distance <= range[AttackKind::Kick] {
            if rng.gen::<f32>() < 0.8 {
                Some(AttackKind::Kick).filter(|kind| affordable(*kind))
            } else {
                Some(AttackKind::Special).filter(|kind| affordable(*kind))
            }
        } else if distance <= range[AttackKind::Special] {
            Some(AttackKind::Special).filter(|kind| affordable(*kind))
        } else {
            None
        }
    }

    /// Next combo entry; exhausting the plan reverts to aggressive.
    fn combo_step(&mut self, energy: f32) -> Option<AttackKind> {
        let plan = self.combo.get_or_insert_with(|| ComboPlan::for_energy(energy));
        let next = plan.next_affordable(energy);
        if next.is_none() {
            self.finish_combo();
        }
        next
    }

    fn advance_combo(&mut self, started: AttackKind) {
        if self.behavior != BehaviorState::Combo {
            return;
        }
        let Some(plan) = self.combo.as_mut() else {
            return;
        };
        if plan.sequence.get(plan.cursor) == Some(&started) {
            plan.cursor += 1;
        }
        if plan.is_exhausted() {
            self.finish_combo();
        }
    }

    fn finish_combo(&mut self) {
        self.combo = None;
        self.behavior = BehaviorState::Aggressive;
    }

    // ------------------------------------------------------------------------
    // 3. Positioning
    // ------------------------------------------------------------------------

    fn position(
        &mut self,
        me: &Combatant,
        opponent: &OpponentView,
        distance: f32,
        toward: i8,
    ) -> Positioning {
        if me.is_attacking() || me.is_blocking() {
            return Positioning::Freeze;
        }

        let range = &me.stats.range;
        if distance > range[AttackKind::Kick] * 1.2 {
            self.pursuit_timer = PURSUIT_FRAMES;
            Positioning::Move(toward)
        } else if distance < range[AttackKind::Punch] * 0.4 && !opponent.is_attacking {
            Positioning::Move(-toward)
        } else if self.pursuit_timer > 0 {
            Positioning::Move(toward)
        } else {
            Positioning::Hold
        }
    }

    // ------------------------------------------------------------------------
    // 4. Deliberate decision cycle
    // ------------------------------------------------------------------------

    fn deliberate(
        &mut self,
        me: &mut Combatant,
        opponent: &OpponentView,
        distance: f32,
        toward: i8,
        rng: &mut dyn RngCore,
    ) {
        self.decision_timer = self.decision_timer.saturating_sub(1);
        if self.decision_timer > 0 {
            return;
        }

        let reaction = self.profile.reaction_time;
        self.decision_timer = rng.gen_range(reaction / 2..=reaction + 10).max(1);

        self.movement_bias = match self.behavior {
            BehaviorState::Aggressive => self.aggressive_bias(me, distance, toward, rng),
            BehaviorState::Defensive => self.defensive_bias(me, opponent, distance, toward, rng),
            BehaviorState::Combo => self.combo_bias(me, distance, toward),
        };

        if self.state_timer == 0 {
            self.change_behavior(me, opponent, rng);
        }
    }

    fn aggressive_bias(
        &self,
        me: &mut Combatant,
        distance: f32,
        toward: i8,
        rng: &mut dyn RngCore,
    ) -> i8 {
        let range = me.stats.range;
        if distance > range[AttackKind::Kick] * 1.1 {
            if me.body.on_ground && rng.gen::<f32>() < JUMP_IN_CHANCE {
                me.jump(JUMP_IN_SCALE);
            }
            toward
        } else if distance < range[AttackKind::Punch] * 0.4 {
            if rng.gen::<f32>() < 0.6 {
                0
            } else {
                -toward
            }
        } else if rng.gen::<f32>() < 0.4 {
            toward
        } else {
            *[-1, 1, 0].choose(rng).unwrap_or(&0)
        }
    }

    fn defensive_bias(
        &self,
        me: &Combatant,
        opponent: &OpponentView,
        distance: f32,
        toward: i8,
        rng: &mut dyn RngCore,
    ) -> i8 {
        let range = &me.stats.range;
        if distance < range[AttackKind::Punch] * 0.8 {
            // Отступаем, но иногда стоим и ждём окно для контратаки
            if rng.gen::<f32>() < 0.3 && !opponent.is_attacking {
                0
            } else {
                -toward
            }
        } else if distance > range[AttackKind::Kick] * 1.5 {
            toward
        } else if rng.gen::<f32>() < 0.4 {
            0
        } else {
            *[-1, 1].choose(rng).unwrap_or(&0)
        }
    }

    fn combo_bias(&mut self, me: &Combatant, distance: f32, toward: i8) -> i8 {
        if self.combo.is_none() {
            self.combo = Some(ComboPlan::for_energy(me.energy.current));
        }

        let ideal = me.stats.range[AttackKind::Punch] * 0.7;
        if distance > ideal {
            toward
        } else if distance < ideal * 0.5 {
            -toward
        } else {
            0
        }
    }

    /// Health-ratio driven behavior switch.
    fn change_behavior(&mut self, me: &Combatant, opponent: &OpponentView, rng: &mut dyn RngCore) {
        if rng.gen::<f32>() < 0.3 {
            self.consecutive_attacks = self.consecutive_attacks.saturating_sub(1);
        }

        let mine = me.health_ratio();
        let theirs = opponent.health_ratio;
        let previous = self.behavior;

        let (behavior, timer) = if mine < 0.25 {
            (BehaviorState::Defensive, 120)
        } else if theirs < 0.3 && me.energy.current > 40.0 {
            (BehaviorState::Combo, 90)
        } else if mine > 0.7 && theirs > 0.5 {
            (BehaviorState::Aggressive, rng.gen_range(90..=180))
        } else if self.consecutive_attacks >= 3 {
            (BehaviorState::Aggressive, 120)
        } else if mine > theirs {
            (BehaviorState::Aggressive, rng.gen_range(60..=150))
        } else {
            (BehaviorState::Defensive, rng.gen_range(60..=150))
        };

        self.behavior = behavior;
        self.state_timer = timer;

        if behavior == BehaviorState::Combo {
            if previous != BehaviorState::Combo || self.combo.is_none() {
                self.combo = Some(ComboPlan::for_energy(me.energy.current));
            }
        } else {
            self.combo = None;
        }

        if behavior != previous {
            crate::logger::log(&format!(
                "AI ({}) behavior {:?} → {:?} (self {:.2}, target {:.2})",
                self.difficulty.name(),
                previous,
                behavior,
                mine,
                theirs
            ));
        }
    }
}
