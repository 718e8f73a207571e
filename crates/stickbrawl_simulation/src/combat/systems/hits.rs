//! Hit resolution system.

use bevy::prelude::*;

use crate::combat::collision::{check_hit, HitReport};
use crate::combat::damage::DamageOutcome;
use crate::combat::{Combatant, DamageDealt, EntityDied};
use crate::DeterministicRng;

/// System: проверка hitbox ↔ hurtbox в обе стороны для каждой пары бойцов
///
/// Порядок A→B, B→A не важен: каждый swing обнуляет hitbox при первом контакте.
pub fn resolve_hits(
    mut fighters: Query<(Entity, &mut Combatant)>,
    mut rng: ResMut<DeterministicRng>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
) {
    let mut pairs = fighters.iter_combinations_mut();
    while let Some([(a_entity, mut a), (b_entity, mut b)]) = pairs.fetch_next() {
        if let Some(report) = check_hit(a_entity, &mut a, &mut b, &mut rng.rng) {
            report_hit(a_entity, b_entity, report, &mut damage_events, &mut death_events);
        }
        if let Some(report) = check_hit(b_entity, &mut b, &mut a, &mut rng.rng) {
            report_hit(b_entity, a_entity, report, &mut damage_events, &mut death_events);
        }
    }
}

fn report_hit(
    attacker: Entity,
    target: Entity,
    report: HitReport,
    damage_events: &mut EventWriter<DamageDealt>,
    death_events: &mut EventWriter<EntityDied>,
) {
    if !report.outcome.landed() {
        return;
    }

    damage_events.write(DamageDealt {
        attacker,
        target,
        kind: report.kind,
        damage: report.outcome.damage(),
        blocked: matches!(report.outcome, DamageOutcome::Blocked { .. }),
        critical: report.critical,
        target_died: report.target_died,
    });

    if report.target_died {
        death_events.write(EntityDied {
            entity: target,
            killer: Some(attacker),
        });
    }
}
