//! Damage rules и combat события
//!
//! - Block: урон × (1 − damage_reduction), округление вниз
//! - Critical: урон × 1.5 (только при critical_chance > 0)
//! - DamageDealt / EntityDied — для UI, звука, счёта матча

use bevy::prelude::*;

use crate::combat::AttackKind;
use crate::components::Facing;
use crate::config::scale_truncated_u32;

pub const CRITICAL_MULTIPLIER: f32 = 1.5;

/// One landed strike, as seen by the defender.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub attacker: Entity,
    pub amount: u32,
    pub attacker_facing: Facing,
    pub kind: AttackKind,
}

/// What `Combatant::take_damage` did with a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dead or invulnerable target, nothing changed.
    Ignored,
    Blocked { damage: u32 },
    Taken { damage: u32 },
}

impl DamageOutcome {
    pub fn damage(&self) -> u32 {
        match self {
            DamageOutcome::Ignored => 0,
            DamageOutcome::Blocked { damage } | DamageOutcome::Taken { damage } => *damage,
        }
    }

    pub fn landed(&self) -> bool {
        !matches!(self, DamageOutcome::Ignored)
    }
}

/// `floor(amount × (1 − reduction))`.
pub fn blocked_damage(amount: u32, damage_reduction: f32) -> u32 {
    scale_truncated_u32(amount, 1.0 - damage_reduction.clamp(0.0, 1.0))
}

pub fn critical_damage(amount: u32) -> u32 {
    scale_truncated_u32(amount, CRITICAL_MULTIPLIER)
}

/// Событие: удар достиг цели
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub kind: AttackKind,
    pub damage: u32,
    pub blocked: bool,
    pub critical: bool,
    pub target_died: bool,
}

/// Событие: health бойца упал до 0
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: боец мертв (health == 0)
///
/// Entity не деспавнится — тело остаётся для рендера и экрана результата.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Система: помечает погибших маркером `Dead`
pub fn mark_dead(mut commands: Commands, mut death_events: EventReader<EntityDied>) {
    for event in death_events.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
            crate::logger::log_info(&format!(
                "Fighter {:?} defeated by {:?}",
                event.entity, event.killer
            ));
        }
    }
}
