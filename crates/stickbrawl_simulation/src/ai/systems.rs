//! Decision system: DecisionPolicy каждого бойца → intents на Combatant.

use std::collections::HashMap;

use bevy::prelude::*;

use super::events::{BossAbilityUsed, RageTriggered};
use super::policy::{DecisionContext, FighterBrain, OpponentView};
use crate::combat::Combatant;
use crate::components::{FighterSlot, Opponent};
use crate::input::InputSnapshot;
use crate::DeterministicRng;

/// System: один decision step для каждого бойца
///
/// Сначала снимаем read-only вид всех бойцов, чтобы P2 видел состояние P1
/// до его решений этого кадра. Порядок обхода — по FighterSlot (RNG
/// потребляется детерминированно).
pub fn decide_actions(
    mut fighters: Query<(
        Entity,
        &FighterSlot,
        &Opponent,
        &mut Combatant,
        &mut FighterBrain,
        Option<&InputSnapshot>,
    )>,
    mut rng: ResMut<DeterministicRng>,
    mut rage_events: EventWriter<RageTriggered>,
    mut ability_events: EventWriter<BossAbilityUsed>,
) {
    let views: HashMap<Entity, OpponentView> = fighters
        .iter()
        .map(|(entity, _, _, combatant, _, _)| (entity, OpponentView::of(combatant)))
        .collect();

    let mut order: Vec<(FighterSlot, Entity)> = fighters
        .iter()
        .map(|(entity, slot, ..)| (*slot, entity))
        .collect();
    order.sort();

    for (_, entity) in order {
        let Ok((_, _, opponent, mut combatant, mut brain, input)) = fighters.get_mut(entity) else {
            continue;
        };
        let Some(view) = views.get(&opponent.0) else {
            continue;
        };

        let was_raged = brain.as_boss().is_some_and(|boss| boss.rage_mode);

        let mut ctx = DecisionContext {
            opponent: view,
            input,
            rng: &mut rng.rng,
        };
        brain.policy_mut().decide(&mut combatant, &mut ctx);

        if let Some(boss) = brain.as_boss() {
            if boss.rage_mode && !was_raged {
                rage_events.write(RageTriggered { boss: entity });
            }
            if let Some(ability) = boss.last_ability {
                ability_events.write(BossAbilityUsed {
                    boss: entity,
                    ability,
                });
            }
        }
    }
}
