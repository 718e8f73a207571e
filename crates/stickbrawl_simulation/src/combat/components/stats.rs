//! Effective fighter stats and the equipment effect resolver.
//!
//! Derived stats are always recomputed from the base (archetype + difficulty /
//! boss overrides), never compounded onto the previous derived set.

use std::collections::BTreeMap;

use crate::config::{
    scale_truncated, scale_truncated_u32, AttackTable, CharacterArchetype, EffectKind,
    EquipmentItem, StackingRule,
};

/// Upper bound on block damage reduction granted through equipment.
pub const MAX_EQUIPPED_DAMAGE_REDUCTION: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct FighterStats {
    pub max_health: u32,
    pub speed: f32,
    pub energy_regen: f32,
    pub damage: AttackTable<u32>,
    pub range: AttackTable<f32>,
    pub cooldown: AttackTable<u32>,
    pub damage_reduction: f32,
    pub critical_chance: f32,
}

impl FighterStats {
    pub fn from_archetype(archetype: &CharacterArchetype) -> Self {
        Self {
            max_health: archetype.max_health,
            speed: archetype.speed,
            energy_regen: archetype.energy_regen,
            damage: archetype.damage,
            range: archetype.range,
            cooldown: archetype.cooldown,
            damage_reduction: archetype.damage_reduction,
            critical_chance: 0.0,
        }
    }

    /// Applies equipment on top of `self` (treated as the base).
    pub fn with_equipment<'a, I>(&self, items: I, rule: StackingRule) -> Self
    where
        I: IntoIterator<Item = &'a EquipmentItem>,
    {
        let mut derived = self.clone();

        for (kind, value) in effect_totals(items, rule) {
            match kind {
                EffectKind::AttackBonus => {
                    derived.damage = self.damage.map(|d| scale_truncated_u32(*d, value));
                }
                EffectKind::SpeedBonus => {
                    derived.speed = scale_truncated(self.speed, value);
                }
                EffectKind::DefenseBonus => {
                    derived.damage_reduction =
                        (self.damage_reduction * value).min(MAX_EQUIPPED_DAMAGE_REDUCTION);
                }
                EffectKind::EnergyBonus => {
                    derived.energy_regen = self.energy_regen * value;
                }
                EffectKind::HealthBonus => {
                    derived.max_health = scale_truncated_u32(self.max_health, value).max(1);
                }
                EffectKind::CriticalBonus => {
                    derived.critical_chance = (self.critical_chance + value).clamp(0.0, 1.0);
                }
            }
        }

        derived
    }

    /// Multiplies damage/speed/regen (rage). Damage and speed are truncated.
    pub fn scaled(&self, damage: f32, speed: f32, energy_regen: f32) -> Self {
        Self {
            damage: self.damage.map(|d| scale_truncated_u32(*d, damage)),
            speed: scale_truncated(self.speed, speed),
            energy_regen: self.energy_regen * energy_regen,
            ..self.clone()
        }
    }
}

/// Folds item effects into one value per category.
///
/// Multiplicative: category multipliers multiply, critical chances add.
/// LastWins: the last item (iteration order) of each category overwrites.
pub fn effect_totals<'a, I>(items: I, rule: StackingRule) -> BTreeMap<EffectKind, f32>
where
    I: IntoIterator<Item = &'a EquipmentItem>,
{
    let mut totals: BTreeMap<EffectKind, f32> = BTreeMap::new();

    for item in items {
        for (kind, value) in &item.effects {
            match (rule, totals.get_mut(kind)) {
                (StackingRule::Multiplicative, Some(total)) => {
                    if *kind == EffectKind::CriticalBonus {
                        *total += *value;
                    } else {
                        *total *= *value;
                    }
                }
                _ => {
                    totals.insert(*kind, *value);
                }
            }
        }
    }

    totals
}
