//! Combatant — единый тип бойца (игрок, AI, босс).
//!
//! Владеет vitals, телом, состоянием атаки, блоком, статус-таймерами и
//! экипировкой. Решения (кто и когда бьёт) принимает `DecisionPolicy`,
//! урон наносит только collision resolver через `take_damage`.
//!
//! Все невалидные действия молча игнорируются: real-time loop не обрабатывает
//! ошибки, состояние просто не меняется.

use std::collections::BTreeMap;

use bevy::math::Rect;
use bevy::prelude::*;

use super::attack::{AttackKind, AttackPhase, AttackState};
use super::stats::FighterStats;
use crate::audio::SoundCue;
use crate::combat::damage::{blocked_damage, DamageOutcome, Hit};
use crate::combat::hitbox::hitbox_rect;
use crate::components::{Body, Energy, Facing, Health};
use crate::config::{ArenaConfig, AttackTable, CharacterArchetype, EquipmentItem};

// ============================================================================
// Guard (blocking)
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Guard {
    pub blocking: bool,
    /// Frames of block left.
    pub remaining: u32,
    /// Frames until the next block is allowed.
    pub cooldown: u32,
    /// Cooldown armed when the current block ends.
    pub pending_cooldown: u32,
}

impl Guard {
    pub fn is_available(&self) -> bool {
        !self.blocking && self.cooldown == 0
    }

    fn tick(&mut self) {
        if self.blocking {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.blocking = false;
                self.cooldown = self.pending_cooldown;
            }
        } else {
            self.cooldown = self.cooldown.saturating_sub(1);
        }
    }
}

// ============================================================================
// Combo tracker
// ============================================================================

/// Consecutive hits received from the same attacker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComboTracker {
    pub count: u32,
    pub timer: u32,
    pub last_attacker: Option<Entity>,
}

impl ComboTracker {
    fn register(&mut self, attacker: Entity, window: u32) {
        if self.timer > 0 && self.last_attacker == Some(attacker) {
            self.count += 1;
        } else {
            self.count = 1;
        }
        self.last_attacker = Some(attacker);
        self.timer = window;
    }

    fn tick(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
            if self.timer == 0 {
                self.count = 0;
                self.last_attacker = None;
            }
        }
    }
}

// ============================================================================
// Combatant
// ============================================================================

#[derive(Component, Debug, Clone)]
pub struct Combatant {
    pub archetype_id: String,
    /// Archetype + difficulty/boss overrides (+ rage). Equipment is not baked in.
    pub base: FighterStats,
    /// Effective stats = base + equipment.
    pub stats: FighterStats,
    pub health: Health,
    pub energy: Energy,
    pub body: Body,
    pub attack: Option<AttackState>,
    /// Present only during the attack's active window; cleared by the first hit.
    pub hitbox: Option<Rect>,
    /// Remaining frames per attack kind.
    pub cooldowns: AttackTable<u32>,
    pub guard: Guard,
    pub invulnerable_frames: u32,
    pub combo: ComboTracker,
    /// -1 / 0 / +1, consumed by `tick`.
    pub move_direction: i8,
    equipment: BTreeMap<String, EquipmentItem>,
    arena: ArenaConfig,
    cues: Vec<SoundCue>,
}

impl Combatant {
    pub fn new(archetype: &CharacterArchetype, arena: &ArenaConfig, x: f32) -> Self {
        Self::with_stats(&archetype.id, FighterStats::from_archetype(archetype), arena, x)
    }

    /// Builds a fighter from already-adjusted base stats (difficulty, boss).
    pub fn with_stats(archetype_id: &str, base: FighterStats, arena: &ArenaConfig, x: f32) -> Self {
        Self {
            archetype_id: archetype_id.to_string(),
            health: Health::new(base.max_health),
            energy: Energy::new(arena.max_energy, base.energy_regen),
            stats: base.clone(),
            base,
            body: Body::standing(x, arena),
            attack: None,
            hitbox: None,
            cooldowns: AttackTable::splat(0),
            guard: Guard::default(),
            invulnerable_frames: 0,
            combo: ComboTracker::default(),
            move_direction: 0,
            equipment: BTreeMap::new(),
            arena: arena.clone(),
            cues: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Read-only view
    // ------------------------------------------------------------------------

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    pub fn is_blocking(&self) -> bool {
        self.guard.blocking
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_frames > 0
    }

    pub fn health_ratio(&self) -> f32 {
        self.health.ratio()
    }

    pub fn center_x(&self) -> f32 {
        self.body.center_x()
    }

    pub fn attack_phase(&self) -> Option<AttackPhase> {
        self.attack.map(|attack| attack.phase())
    }

    pub fn arena(&self) -> &ArenaConfig {
        &self.arena
    }

    pub fn is_cooldown_ready(&self, kind: AttackKind) -> bool {
        self.cooldowns[kind] == 0
    }

    /// At least one attack kind is off cooldown.
    pub fn has_ready_attack(&self) -> bool {
        AttackKind::ALL.iter().any(|kind| self.is_cooldown_ready(*kind))
    }

    /// Every gate `attempt_attack` checks.
    pub fn can_attack(&self, kind: AttackKind) -> bool {
        self.is_alive()
            && !self.is_attacking()
            && !self.is_blocking()
            && self.is_cooldown_ready(kind)
            && self.energy.can_afford(kind.energy_cost())
    }

    pub fn equipped_ids(&self) -> impl Iterator<Item = &str> {
        self.equipment.keys().map(String::as_str)
    }

    // ------------------------------------------------------------------------
    // Actions (silently rejected when not allowed)
    // ------------------------------------------------------------------------

    /// Starts an attack. Returns whether the swing started.
    pub fn attempt_attack(&mut self, kind: AttackKind) -> bool {
        if !self.can_attack(kind) {
            return false;
        }
        if !self.energy.consume(kind.energy_cost()) {
            return false;
        }

        self.attack = Some(AttackState::new(kind));
        self.hitbox = None;
        self.cooldowns[kind] = self.stats.cooldown[kind];
        self.cues.push(kind.sound());
        true
    }

    /// Raises the guard for `duration` frames; `cooldown` starts when it drops.
    pub fn try_block(&mut self, duration: u32, cooldown: u32) -> bool {
        if !self.is_alive() || self.is_attacking() || !self.guard.is_available() || duration == 0 {
            return false;
        }

        self.guard = Guard {
            blocking: true,
            remaining: duration,
            cooldown: 0,
            pending_cooldown: cooldown,
        };
        self.cues.push(SoundCue::Block);
        true
    }

    /// Jump with `scale × jump_strength`. Ground only.
    pub fn jump(&mut self, scale: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let jumped = self.body.jump(self.arena.jump_strength * scale);
        if jumped {
            self.cues.push(SoundCue::Jump);
        }
        jumped
    }

    pub fn set_move_direction(&mut self, direction: i8) {
        self.move_direction = direction.signum();
    }

    pub fn face(&mut self, facing: Facing) {
        self.body.facing = facing;
    }

    pub fn heal(&mut self, amount: u32) {
        if self.is_alive() {
            self.health.heal(amount);
        }
    }

    pub fn restore_energy(&mut self, amount: f32) {
        self.energy.restore(amount);
    }

    pub fn grant_invulnerability(&mut self, frames: u32) {
        self.invulnerable_frames = self.invulnerable_frames.max(frames);
    }

    // ------------------------------------------------------------------------
    // Damage
    // ------------------------------------------------------------------------

    pub fn take_damage(&mut self, hit: Hit) -> DamageOutcome {
        if !self.is_alive() || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }

        let outcome = if self.is_blocking() {
            self.invulnerable_frames = self.arena.block_invulnerability;
            self.cues.push(SoundCue::Block);
            DamageOutcome::Blocked {
                damage: blocked_damage(hit.amount, self.stats.damage_reduction),
            }
        } else {
            self.invulnerable_frames = self.arena.hit_invulnerability;
            self.cues.push(SoundCue::Hit);
            DamageOutcome::Taken { damage: hit.amount }
        };

        self.combo.register(hit.attacker, self.arena.combo_window);
        self.health.take_damage(outcome.damage());

        // Knockback: от атакующего, сразу в позицию (bounds clamp — в tick)
        self.body.position.x += hit.attacker_facing.sign() * hit.kind.knockback();
        if let Some(launch) = hit.kind.launch_velocity() {
            self.body.velocity.y = launch;
            self.body.on_ground = false;
        }

        if !self.is_alive() {
            self.freeze();
        }

        outcome
    }

    /// Ends the current swing after it connected (one hit per attack).
    pub fn consume_hitbox(&mut self) {
        self.hitbox = None;
        self.attack = None;
    }

    // ------------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------------

    pub fn equip(&mut self, item: EquipmentItem) {
        self.equipment.insert(item.id.clone(), item);
        self.apply_equipment_effects();
    }

    pub fn unequip(&mut self, item_id: &str) -> bool {
        let removed = self.equipment.remove(item_id).is_some();
        if removed {
            self.apply_equipment_effects();
        }
        removed
    }

    /// Re-derives `stats` from `base` + equipped items (id order).
    pub fn apply_equipment_effects(&mut self) {
        self.stats = self
            .base
            .with_equipment(self.equipment.values(), self.arena.equipment_stacking);
        self.sync_vitals();
    }

    /// Replaces the base stats (rage, overrides) and re-derives.
    pub fn rebase(&mut self, base: FighterStats) {
        self.base = base;
        self.apply_equipment_effects();
    }

    fn sync_vitals(&mut self) {
        if self.health.max != self.stats.max_health {
            self.health.rescale_max(self.stats.max_health);
        }
        self.energy.regen_per_frame = self.stats.energy_regen;
    }

    // ------------------------------------------------------------------------
    // Frame update
    // ------------------------------------------------------------------------

    /// One simulation frame: timers, movement, physics, attack progress.
    pub fn tick(&mut self) {
        self.energy.regenerate();
        self.invulnerable_frames = self.invulnerable_frames.saturating_sub(1);
        self.combo.tick();
        self.guard.tick();

        if self.is_alive() {
            self.body.velocity.x = self.move_direction as f32 * self.stats.speed;
            if self.is_blocking() {
                self.body.velocity.x *= self.arena.block_speed_factor;
            }
        } else {
            self.freeze();
        }

        self.body.integrate(&self.arena);
        self.advance_attack();

        for kind in AttackKind::ALL {
            self.cooldowns[kind] = self.cooldowns[kind].saturating_sub(1);
        }
    }

    fn advance_attack(&mut self) {
        let Some(mut attack) = self.attack else {
            self.hitbox = None;
            return;
        };

        if !attack.advance() {
            self.attack = None;
            self.hitbox = None;
            return;
        }

        self.hitbox = attack
            .is_hitbox_active()
            .then(|| hitbox_rect(&self.body, attack.kind, self.stats.range[attack.kind]));
        self.attack = Some(attack);
    }

    /// Мертвый боец: без движения, без атак, без блока (гравитация остаётся).
    fn freeze(&mut self) {
        self.move_direction = 0;
        self.body.velocity.x = 0.0;
        self.attack = None;
        self.hitbox = None;
        self.guard.blocking = false;
    }

    // ------------------------------------------------------------------------
    // Sound cues outbox
    // ------------------------------------------------------------------------

    pub fn has_pending_cues(&self) -> bool {
        !self.cues.is_empty()
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }
}
