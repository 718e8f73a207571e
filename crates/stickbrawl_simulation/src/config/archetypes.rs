//! Character and boss archetype tables.

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ensure_positive, invalid, report_rejected, ConfigError};
use crate::combat::AttackKind;

/// One value per attack kind. Every kind is always present (enforced by type).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackTable<T> {
    pub punch: T,
    pub kick: T,
    pub special: T,
    pub ultimate: T,
}

impl<T> AttackTable<T> {
    pub const fn new(punch: T, kick: T, special: T, ultimate: T) -> Self {
        Self {
            punch,
            kick,
            special,
            ultimate,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> AttackTable<U> {
        AttackTable {
            punch: f(&self.punch),
            kick: f(&self.kick),
            special: f(&self.special),
            ultimate: f(&self.ultimate),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttackKind, &T)> {
        AttackKind::ALL.into_iter().map(move |kind| (kind, &self[kind]))
    }
}

impl<T: Copy> AttackTable<T> {
    pub const fn splat(value: T) -> Self {
        Self::new(value, value, value, value)
    }
}

impl<T> Index<AttackKind> for AttackTable<T> {
    type Output = T;

    fn index(&self, kind: AttackKind) -> &T {
        match kind {
            AttackKind::Punch => &self.punch,
            AttackKind::Kick => &self.kick,
            AttackKind::Special => &self.special,
            AttackKind::Ultimate => &self.ultimate,
        }
    }
}

impl<T> IndexMut<AttackKind> for AttackTable<T> {
    fn index_mut(&mut self, kind: AttackKind) -> &mut T {
        match kind {
            AttackKind::Punch => &mut self.punch,
            AttackKind::Kick => &mut self.kick,
            AttackKind::Special => &mut self.special,
            AttackKind::Ultimate => &mut self.ultimate,
        }
    }
}

/// Display colour for the renderer (not used by the simulation itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Immutable stat template of a playable fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterArchetype {
    pub id: String,
    pub name: String,
    pub color: Rgb,
    pub max_health: u32,
    /// Pixels per frame.
    pub speed: f32,
    /// Energy per frame.
    pub energy_regen: f32,
    pub damage: AttackTable<u32>,
    pub range: AttackTable<f32>,
    /// Frames.
    pub cooldown: AttackTable<u32>,
    /// Fraction of damage absorbed while blocking, in [0, 1].
    pub damage_reduction: f32,
}

impl CharacterArchetype {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let id = self.id.as_str();
        if id.is_empty() {
            return Err(invalid("<unnamed>", "id", "must not be empty"));
        }
        if self.max_health == 0 {
            return Err(invalid(id, "max_health", "must be positive"));
        }
        ensure_positive(id, "speed", self.speed)?;
        ensure_positive(id, "energy_regen", self.energy_regen)?;

        for (kind, damage) in self.damage.iter() {
            if *damage == 0 {
                return Err(invalid(id, &format!("damage.{}", kind.name()), "must be positive"));
            }
        }
        for (kind, range) in self.range.iter() {
            ensure_positive(id, &format!("range.{}", kind.name()), *range)?;
        }
        for (kind, cooldown) in self.cooldown.iter() {
            if *cooldown == 0 {
                return Err(invalid(id, &format!("cooldown.{}", kind.name()), "must be positive"));
            }
        }

        if !(0.0..=1.0).contains(&self.damage_reduction) {
            return Err(invalid(id, "damage_reduction", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Special abilities a boss can fire off its ability timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum BossAbility {
    /// Special attack when the target is within 150.
    FireBreath,
    /// 60 frames of invulnerability.
    FlameShield,
    /// Ultimate attack when the target is within 200.
    IceStorm,
    /// Kick when the target is within 100.
    FreezeAttack,
    /// +2 to the consecutive-attack streak.
    ShadowClone,
    /// Blink next to a distant target, then punch.
    TeleportStrike,
}

impl BossAbility {
    pub fn name(&self) -> &'static str {
        match self {
            BossAbility::FireBreath => "fire_breath",
            BossAbility::FlameShield => "flame_shield",
            BossAbility::IceStorm => "ice_storm",
            BossAbility::FreezeAttack => "freeze_attack",
            BossAbility::ShadowClone => "shadow_clone",
            BossAbility::TeleportStrike => "teleport_strike",
        }
    }
}

fn default_rage_threshold() -> f32 {
    0.3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossArchetype {
    pub fighter: CharacterArchetype,
    /// Coins paid out when the player defeats this boss.
    pub reward: u32,
    pub abilities: Vec<BossAbility>,
    #[serde(default = "default_rage_threshold")]
    pub rage_threshold: f32,
}

impl BossArchetype {
    pub fn id(&self) -> &str {
        &self.fighter.id
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fighter.validate()?;
        if !(self.rage_threshold > 0.0 && self.rage_threshold < 1.0) {
            return Err(invalid(self.id(), "rage_threshold", "must be within (0, 1)"));
        }
        Ok(())
    }
}

/// RON document layout for [`ArchetypeRegistry::from_ron_str`].
#[derive(Debug, Deserialize)]
struct RegistryFile {
    characters: Vec<CharacterArchetype>,
    #[serde(default)]
    bosses: Vec<BossArchetype>,
}

/// All archetypes keyed by id.
#[derive(Resource, Debug, Clone)]
pub struct ArchetypeRegistry {
    characters: BTreeMap<String, CharacterArchetype>,
    bosses: BTreeMap<String, BossArchetype>,
}

impl Default for ArchetypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ArchetypeRegistry {
    pub fn new(
        characters: Vec<CharacterArchetype>,
        bosses: Vec<BossArchetype>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self {
            characters: BTreeMap::new(),
            bosses: BTreeMap::new(),
        };

        for archetype in characters {
            archetype.validate()?;
            if registry.characters.contains_key(&archetype.id) {
                return Err(invalid(&archetype.id, "id", "duplicate character id"));
            }
            registry.characters.insert(archetype.id.clone(), archetype);
        }

        for boss in bosses {
            boss.validate()?;
            if registry.bosses.contains_key(boss.id()) {
                return Err(invalid(boss.id(), "id", "duplicate boss id"));
            }
            registry.bosses.insert(boss.id().to_string(), boss);
        }

        Ok(registry)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let parsed = ron::from_str::<RegistryFile>(text)
            .map_err(ConfigError::from)
            .and_then(|file| Self::new(file.characters, file.bosses));
        report_rejected("archetype", parsed)
    }

    pub fn character(&self, id: &str) -> Result<&CharacterArchetype, ConfigError> {
        self.characters
            .get(id)
            .ok_or_else(|| ConfigError::UnknownArchetype(id.to_string()))
    }

    pub fn boss(&self, id: &str) -> Result<&BossArchetype, ConfigError> {
        self.bosses
            .get(id)
            .ok_or_else(|| ConfigError::UnknownBoss(id.to_string()))
    }

    pub fn character_ids(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    pub fn boss_ids(&self) -> impl Iterator<Item = &str> {
        self.bosses.keys().map(String::as_str)
    }

    /// Built-in roster (6 fighters, 3 bosses).
    pub fn builtin() -> Self {
        let characters = vec![
            character(
                "warrior", "Warrior", Rgb(255, 140, 0), 120, 5.0, 0.4,
                AttackTable::new(10, 15, 25, 40),
                AttackTable::new(50.0, 65.0, 85.0, 110.0),
                AttackTable::new(18, 30, 70, 180),
                0.3,
            ),
            character(
                "assassin", "Assassin", Rgb(75, 0, 130), 80, 8.0, 0.6,
                AttackTable::new(12, 18, 30, 55),
                AttackTable::new(45.0, 60.0, 75.0, 90.0),
                AttackTable::new(12, 20, 50, 120),
                0.1,
            ),
            character(
                "tank", "Tank", Rgb(105, 105, 105), 180, 3.0, 0.3,
                AttackTable::new(8, 12, 20, 35),
                AttackTable::new(55.0, 70.0, 90.0, 120.0),
                AttackTable::new(25, 40, 90, 220),
                0.6,
            ),
            character(
                "mage", "Mage", Rgb(138, 43, 226), 90, 4.0, 0.8,
                AttackTable::new(6, 10, 35, 60),
                AttackTable::new(40.0, 55.0, 130.0, 160.0),
                AttackTable::new(20, 35, 60, 150),
                0.2,
            ),
            character(
                "ninja", "Ninja", Rgb(25, 25, 112), 95, 7.0, 0.5,
                AttackTable::new(11, 16, 28, 45),
                AttackTable::new(48.0, 63.0, 80.0, 100.0),
                AttackTable::new(15, 25, 55, 140),
                0.25,
            ),
            character(
                "boxer", "Boxer", Rgb(220, 20, 60), 110, 6.0, 0.45,
                AttackTable::new(15, 8, 32, 50),
                AttackTable::new(52.0, 45.0, 70.0, 85.0),
                AttackTable::new(10, 35, 65, 160),
                0.35,
            ),
        ];

        let bosses = vec![
            BossArchetype {
                fighter: character(
                    "fire_demon", "Fire Demon", Rgb(200, 50, 50), 300, 4.0, 0.8,
                    AttackTable::new(15, 20, 35, 60),
                    AttackTable::new(60.0, 80.0, 120.0, 150.0),
                    AttackTable::new(15, 25, 50, 120),
                    0.4,
                ),
                reward: 50,
                abilities: vec![BossAbility::FireBreath, BossAbility::FlameShield],
                rage_threshold: default_rage_threshold(),
            },
            BossArchetype {
                fighter: character(
                    "ice_giant", "Ice Giant", Rgb(100, 150, 255), 400, 3.0, 0.6,
                    AttackTable::new(18, 25, 40, 70),
                    AttackTable::new(70.0, 90.0, 130.0, 160.0),
                    AttackTable::new(20, 30, 60, 150),
                    0.5,
                ),
                reward: 75,
                abilities: vec![BossAbility::IceStorm, BossAbility::FreezeAttack],
                rage_threshold: default_rage_threshold(),
            },
            BossArchetype {
                fighter: character(
                    "shadow_lord", "Shadow Lord", Rgb(80, 80, 120), 350, 6.0, 1.0,
                    AttackTable::new(20, 28, 45, 80),
                    AttackTable::new(65.0, 85.0, 140.0, 180.0),
                    AttackTable::new(12, 20, 45, 100),
                    0.3,
                ),
                reward: 100,
                abilities: vec![BossAbility::ShadowClone, BossAbility::TeleportStrike],
                rage_threshold: default_rage_threshold(),
            },
        ];

        Self {
            characters: characters.into_iter().map(|c| (c.id.clone(), c)).collect(),
            bosses: bosses.into_iter().map(|b| (b.id().to_string(), b)).collect(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn character(
    id: &str,
    name: &str,
    color: Rgb,
    max_health: u32,
    speed: f32,
    energy_regen: f32,
    damage: AttackTable<u32>,
    range: AttackTable<f32>,
    cooldown: AttackTable<u32>,
    damage_reduction: f32,
) -> CharacterArchetype {
    CharacterArchetype {
        id: id.to_string(),
        name: name.to_string(),
        color,
        max_health,
        speed,
        energy_regen,
        damage,
        range,
        cooldown,
        damage_reduction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roster_is_valid() {
        let registry = ArchetypeRegistry::builtin();
        for id in registry.character_ids() {
            registry.character(id).unwrap().validate().unwrap();
        }
        for id in registry.boss_ids() {
            registry.boss(id).unwrap().validate().unwrap();
        }
        assert_eq!(registry.character_ids().count(), 6);
        assert_eq!(registry.boss_ids().count(), 3);
    }

    #[test]
    fn test_warrior_stats() {
        let registry = ArchetypeRegistry::builtin();
        let warrior = registry.character("warrior").unwrap();
        assert_eq!(warrior.max_health, 120);
        assert_eq!(warrior.damage[AttackKind::Punch], 10);
        assert_eq!(warrior.cooldown[AttackKind::Ultimate], 180);
        assert_eq!(warrior.range[AttackKind::Kick], 65.0);
    }

    #[test]
    fn test_unknown_ids_fail_fast() {
        let registry = ArchetypeRegistry::builtin();
        assert!(matches!(
            registry.character("pirate"),
            Err(ConfigError::UnknownArchetype(id)) if id == "pirate"
        ));
        assert!(matches!(registry.boss("warrior"), Err(ConfigError::UnknownBoss(_))));
    }

    #[test]
    fn test_validation_rejects_bad_stats() {
        let mut broken = ArchetypeRegistry::builtin().character("tank").unwrap().clone();
        broken.damage_reduction = 1.5;
        assert!(broken.validate().is_err());

        let mut broken = ArchetypeRegistry::builtin().character("tank").unwrap().clone();
        broken.range.special = 0.0;
        let err = broken.validate().unwrap_err();
        assert!(err.to_string().contains("range.special"), "{}", err);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let warrior = ArchetypeRegistry::builtin().character("warrior").unwrap().clone();
        let result = ArchetypeRegistry::new(vec![warrior.clone(), warrior], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_ron_missing_kind_is_parse_error() {
        let text = r#"(
            characters: [(
                id: "stub", name: "Stub", color: (1, 2, 3),
                max_health: 50, speed: 3.0, energy_regen: 0.5,
                damage: (punch: 1, kick: 2, special: 3),
                range: (punch: 1.0, kick: 2.0, special: 3.0, ultimate: 4.0),
                cooldown: (punch: 1, kick: 2, special: 3, ultimate: 4),
                damage_reduction: 0.1,
            )],
        )"#;
        assert!(matches!(
            ArchetypeRegistry::from_ron_str(text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_ron_roundtrip_single_character() {
        let text = r#"(
            characters: [(
                id: "stub", name: "Stub", color: (1, 2, 3),
                max_health: 50, speed: 3.0, energy_regen: 0.5,
                damage: (punch: 1, kick: 2, special: 3, ultimate: 4),
                range: (punch: 1.0, kick: 2.0, special: 3.0, ultimate: 4.0),
                cooldown: (punch: 1, kick: 2, special: 3, ultimate: 4),
                damage_reduction: 0.1,
            )],
        )"#;
        let registry = ArchetypeRegistry::from_ron_str(text).unwrap();
        assert_eq!(registry.character("stub").unwrap().max_health, 50);
        assert_eq!(registry.boss_ids().count(), 0);
    }
}
