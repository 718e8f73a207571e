//! Boss overlay поверх AiController: rage + special abilities.
//!
//! Босс — обычный nightmare AI со статами из BossArchetype. Сверху:
//! - rage: одноразовый буст статов при health ratio ≤ threshold
//! - ability timer: каждые 180–300 кадров шанс 30% на случайную способность

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::controller::AiController;
use super::difficulty::Difficulty;
use super::policy::OpponentView;
use crate::combat::{AttackKind, Combatant};
use crate::config::{BossAbility, BossArchetype};

pub const RAGE_DAMAGE_MULTIPLIER: f32 = 1.3;
pub const RAGE_SPEED_MULTIPLIER: f32 = 1.2;
pub const RAGE_REGEN_MULTIPLIER: f32 = 1.5;

const ABILITY_CHANCE: f32 = 0.3;
const ABILITY_COOLDOWN: std::ops::RangeInclusive<u32> = 180..=300;
const FLAME_SHIELD_FRAMES: u32 = 60;
const SHADOW_CLONE_STREAK: u32 = 2;
const TELEPORT_MIN_DISTANCE: f32 = 80.0;
const TELEPORT_OFFSET: f32 = 60.0;

impl BossAbility {
    /// Frames the visual effect stays up (none for freeze/teleport).
    pub fn effect_frames(&self) -> Option<u32> {
        match self {
            BossAbility::FireBreath => Some(30),
            BossAbility::FlameShield => Some(60),
            BossAbility::IceStorm => Some(45),
            BossAbility::ShadowClone => Some(90),
            BossAbility::FreezeAttack | BossAbility::TeleportStrike => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BossController {
    pub ai: AiController,
    pub boss_id: String,
    pub abilities: Vec<BossAbility>,
    pub rage_threshold: f32,
    pub rage_mode: bool,
    pub special_attack_timer: u32,
    /// Active visual effects: (ability, frames left).
    pub effects: Vec<(BossAbility, u32)>,
    /// Ability fired during the last update, if any.
    pub last_ability: Option<BossAbility>,
}

impl BossController {
    pub fn new(archetype: &BossArchetype) -> Self {
        Self {
            ai: AiController::new(Difficulty::Nightmare),
            boss_id: archetype.id().to_string(),
            abilities: archetype.abilities.clone(),
            rage_threshold: archetype.rage_threshold,
            rage_mode: false,
            special_attack_timer: 0,
            effects: Vec::new(),
            last_ability: None,
        }
    }

    pub fn update(&mut self, me: &mut Combatant, opponent: &OpponentView, rng: &mut dyn RngCore) {
        self.last_ability = None;
        self.tick_effects();

        if me.is_alive() && opponent.is_alive {
            self.check_rage(me);

            self.special_attack_timer = self.special_attack_timer.saturating_sub(1);
            if self.special_attack_timer == 0 && rng.gen::<f32>() < ABILITY_CHANCE {
                self.use_special_ability(me, opponent, rng);
                self.special_attack_timer = rng.gen_range(ABILITY_COOLDOWN);
            }
        }

        self.ai.update(me, opponent, rng);
    }

    /// Enters rage once; later threshold crossings do nothing.
    pub fn check_rage(&mut self, me: &mut Combatant) {
        if self.rage_mode || me.health_ratio() > self.rage_threshold {
            return;
        }

        self.rage_mode = true;
        let raged = me.base.scaled(
            RAGE_DAMAGE_MULTIPLIER,
            RAGE_SPEED_MULTIPLIER,
            RAGE_REGEN_MULTIPLIER,
        );
        me.rebase(raged);

        crate::logger::log_info(&format!(
            "👹 {} enters rage (health {}/{})",
            self.boss_id, me.health.current, me.health.max
        ));
    }

    fn use_special_ability(
        &mut self,
        me: &mut Combatant,
        opponent: &OpponentView,
        rng: &mut dyn RngCore,
    ) {
        let Some(ability) = self.abilities.choose(rng).copied() else {
            return;
        };

        let offset = opponent.center_x - me.center_x();
        let distance = offset.abs();

        match ability {
            BossAbility::FireBreath => {
                if distance <= 150.0 {
                    me.attempt_attack(AttackKind::Special);
                }
            }
            BossAbility::FlameShield => {
                me.grant_invulnerability(FLAME_SHIELD_FRAMES);
            }
            BossAbility::IceStorm => {
                if distance <= 200.0 {
                    me.attempt_attack(AttackKind::Ultimate);
                }
            }
            BossAbility::FreezeAttack => {
                if distance <= 100.0 {
                    me.attempt_attack(AttackKind::Kick);
                }
            }
            BossAbility::ShadowClone => {
                self.ai.consecutive_attacks += SHADOW_CLONE_STREAK;
            }
            BossAbility::TeleportStrike => {
                if distance > TELEPORT_MIN_DISTANCE {
                    // Встаём на ближнюю к нам сторону цели
                    let side = if offset > 0.0 { -1.0 } else { 1.0 };
                    me.body.set_center_x(opponent.center_x + side * TELEPORT_OFFSET);
                    me.attempt_attack(AttackKind::Punch);
                }
            }
        }

        if let Some(frames) = ability.effect_frames() {
            self.effects.push((ability, frames));
        }
        self.last_ability = Some(ability);

        crate::logger::log(&format!("👹 {} uses {}", self.boss_id, ability.name()));
    }

    fn tick_effects(&mut self) {
        for (_, frames) in self.effects.iter_mut() {
            *frames = frames.saturating_sub(1);
        }
        self.effects.retain(|(_, frames)| *frames > 0);
    }
}
