//! Shop equipment catalog.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ensure_positive, invalid, report_rejected, ConfigError};

/// Stat category an item modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Multiplies every attack damage.
    AttackBonus,
    /// Multiplies movement speed.
    SpeedBonus,
    /// Multiplies block damage reduction (capped at 0.8).
    DefenseBonus,
    /// Multiplies energy regeneration.
    EnergyBonus,
    /// Multiplies max health, keeping the current health ratio.
    HealthBonus,
    /// Additive critical-hit chance.
    CriticalBonus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub effects: BTreeMap<EffectKind, f32>,
}

impl EquipmentItem {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.is_empty() {
            return Err(invalid("<unnamed>", "id", "must not be empty"));
        }
        if self.effects.is_empty() {
            return Err(invalid(&self.id, "effects", "item has no effect"));
        }
        for (kind, value) in &self.effects {
            ensure_positive(&self.id, &format!("{:?}", kind), *value)?;
            if *kind == EffectKind::CriticalBonus && *value > 1.0 {
                return Err(invalid(&self.id, "CriticalBonus", "chance above 1.0"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    items: Vec<EquipmentItem>,
}

#[derive(Resource, Debug, Clone)]
pub struct EquipmentCatalog {
    items: BTreeMap<String, EquipmentItem>,
}

impl Default for EquipmentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EquipmentCatalog {
    pub fn new(items: Vec<EquipmentItem>) -> Result<Self, ConfigError> {
        let mut catalog = BTreeMap::new();
        for item in items {
            item.validate()?;
            if catalog.contains_key(&item.id) {
                return Err(invalid(&item.id, "id", "duplicate equipment id"));
            }
            catalog.insert(item.id.clone(), item);
        }
        Ok(Self { items: catalog })
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let parsed = ron::from_str::<CatalogFile>(text)
            .map_err(ConfigError::from)
            .and_then(|file| Self::new(file.items));
        report_rejected("equipment", parsed)
    }

    pub fn item(&self, id: &str) -> Result<&EquipmentItem, ConfigError> {
        self.items
            .get(id)
            .ok_or_else(|| ConfigError::UnknownEquipment(id.to_string()))
    }

    /// Resolves a set of ids in order; the first unknown id fails the whole lookup.
    pub fn resolve<'a, I>(&self, ids: I) -> Result<Vec<EquipmentItem>, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter()
            .map(|id| self.item(id).cloned())
            .collect()
    }

    pub fn items(&self) -> impl Iterator<Item = &EquipmentItem> {
        self.items.values()
    }

    pub fn builtin() -> Self {
        let items = [
            ("power_gloves", "Power Gloves", 100, EffectKind::AttackBonus, 1.2),
            ("speed_boots", "Speed Boots", 150, EffectKind::SpeedBonus, 1.3),
            ("armor_vest", "Armor Vest", 200, EffectKind::DefenseBonus, 1.4),
            ("energy_ring", "Energy Ring", 120, EffectKind::EnergyBonus, 1.5),
            ("health_amulet", "Health Amulet", 180, EffectKind::HealthBonus, 1.25),
            ("critical_sword", "Critical Sword", 250, EffectKind::CriticalBonus, 0.15),
        ];

        Self {
            items: items
                .into_iter()
                .map(|(id, name, price, kind, value)| {
                    let item = EquipmentItem {
                        id: id.to_string(),
                        name: name.to_string(),
                        price,
                        effects: BTreeMap::from([(kind, value)]),
                    };
                    (item.id.clone(), item)
                })
                .collect(),
        }
    }
}
