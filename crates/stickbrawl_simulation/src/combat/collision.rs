//! Collision resolver: hitbox атакующего против hurtbox защитника.
//!
//! Один swing — максимум один hit: после контакта hitbox обнуляется и атака
//! заканчивается, поэтому порядок проверок (A→B, B→A) не влияет на результат.

use bevy::prelude::*;
use rand::{Rng, RngCore};

use crate::combat::damage::{critical_damage, DamageOutcome, Hit};
use crate::combat::{AttackKind, Combatant};
use crate::components::rects_overlap;

/// Result of a connected swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitReport {
    pub kind: AttackKind,
    pub outcome: DamageOutcome,
    pub critical: bool,
    pub target_died: bool,
}

/// Checks `attacker`'s live hitbox against `defender` and applies the hit.
///
/// Returns `None` when nothing connected. A connected swing is consumed even
/// if the defender was invulnerable (outcome `Ignored`).
pub fn check_hit(
    attacker_entity: Entity,
    attacker: &mut Combatant,
    defender: &mut Combatant,
    rng: &mut dyn RngCore,
) -> Option<HitReport> {
    let hitbox = attacker.hitbox?;
    let kind = attacker.attack?.kind;

    if !defender.is_alive() || !rects_overlap(&hitbox, &defender.body.rect()) {
        return None;
    }

    let mut amount = attacker.stats.damage[kind];
    let critical = attacker.stats.critical_chance > 0.0
        && rng.gen::<f32>() < attacker.stats.critical_chance;
    if critical {
        amount = critical_damage(amount);
    }

    let outcome = defender.take_damage(Hit {
        attacker: attacker_entity,
        amount,
        attacker_facing: attacker.body.facing,
        kind,
    });
    attacker.consume_hitbox();

    Some(HitReport {
        kind,
        outcome,
        critical: critical && outcome.landed(),
        target_died: outcome.landed() && !defender.is_alive(),
    })
}
