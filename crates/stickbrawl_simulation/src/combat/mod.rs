//! Combat module: Combatant state machine, hit geometry, damage rules.
//!
//! ECS ответственность:
//! - Combatant: vitals, attack/block FSM, таймеры, экипировка
//! - Collision: hitbox ↔ hurtbox, один hit на swing
//! - Events: DamageDealt, EntityDied, AudioCue

use bevy::prelude::*;

pub mod collision;
pub mod components;
pub mod damage;
pub mod hitbox;
pub mod systems;


pub use collision::{check_hit, HitReport};
pub use components::*;
pub use damage::{
    blocked_damage, critical_damage, DamageDealt, DamageOutcome, Dead, EntityDied, Hit,
    CRITICAL_MULTIPLIER,
};
pub use hitbox::{hitbox_rect, HITBOX_INSET};

use crate::audio::AudioCue;
use crate::FightSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (60Hz).
///
/// Порядок выполнения:
/// 1. tick_combatants (FightSet::Tick) — таймеры, движение, атаки
/// 2. resolve_hits (FightSet::Resolve) — hitbox ↔ hurtbox, урон
/// 3. emit_audio_cues — звуки кадра (решения + удары)
/// 4. mark_dead — маркер Dead погибшим
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<AudioCue>();

        app.add_systems(
            FixedUpdate,
            (
                systems::tick_combatants.in_set(FightSet::Tick),
                (
                    systems::resolve_hits,
                    systems::emit_audio_cues,
                    damage::mark_dead,
                )
                    .chain()
                    .in_set(FightSet::Resolve),
            ),
        );
    }
}
