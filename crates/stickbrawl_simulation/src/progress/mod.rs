//! Persisted progress: монеты, купленная/надетая экипировка, счётчики побед.
//!
//! Симуляция не делает file I/O. Хост даёт реализацию `ProgressStore`
//! через ресурс `Progress`; матч читает надетые предметы при спавне и
//! сообщает результат в конце.

use std::collections::BTreeSet;

use bevy::prelude::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::FighterSlot;
use crate::config::EquipmentCatalog;
use crate::match_loop::{GameMode, MatchOutcome};

pub const STARTING_COINS: u32 = 100;
pub const DAILY_SIGNIN_REWARD: u32 = 20;

#[derive(Debug, Error, PartialEq)]
pub enum ProgressError {
    #[error("unknown equipment `{0}`")]
    UnknownEquipment(String),

    #[error("not enough coins: need {needed}, have {have}")]
    NotEnoughCoins { needed: u32, have: u32 },

    #[error("equipment `{0}` is already owned")]
    AlreadyOwned(String),

    #[error("equipment `{0}` is not owned")]
    NotOwned(String),

    #[error("failed to encode progress: {0}")]
    Encode(String),

    #[error("failed to decode progress: {0}")]
    Decode(String),
}

pub type ProgressResult<T> = Result<T, ProgressError>;

/// Collaborator contract between a match and whatever persists progress.
pub trait ProgressStore: Send + Sync {
    /// Ids of the items player one fights with.
    fn equipped_items(&self) -> Vec<String>;

    fn record_outcome(&mut self, outcome: &MatchOutcome);
}

/// Injected progress store.
#[derive(Resource)]
pub struct Progress(pub Box<dyn ProgressStore>);

impl Progress {
    pub fn new(store: impl ProgressStore + 'static) -> Self {
        Self(Box::new(store))
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(InMemoryProgress::default())
    }
}

// ============================================================================
// In-memory store + shop
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryProgress {
    pub coins: u32,
    pub owned: BTreeSet<String>,
    pub equipped: BTreeSet<String>,
    pub total_wins: u32,
    pub boss_defeats: u32,
    pub last_signin: Option<NaiveDate>,
}

impl Default for InMemoryProgress {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            owned: BTreeSet::new(),
            equipped: BTreeSet::new(),
            total_wins: 0,
            boss_defeats: 0,
            last_signin: None,
        }
    }
}

impl InMemoryProgress {
    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn buy(&mut self, catalog: &EquipmentCatalog, item_id: &str) -> ProgressResult<()> {
        let item = catalog
            .item(item_id)
            .map_err(|_| ProgressError::UnknownEquipment(item_id.to_string()))?;

        if self.owned.contains(item_id) {
            return Err(ProgressError::AlreadyOwned(item_id.to_string()));
        }
        if self.coins < item.price {
            return Err(ProgressError::NotEnoughCoins {
                needed: item.price,
                have: self.coins,
            });
        }

        self.coins -= item.price;
        self.owned.insert(item_id.to_string());
        crate::logger::log(&format!("🛒 bought {} for {} coins", item.name, item.price));
        Ok(())
    }

    pub fn equip(&mut self, item_id: &str) -> ProgressResult<()> {
        if !self.owned.contains(item_id) {
            return Err(ProgressError::NotOwned(item_id.to_string()));
        }
        self.equipped.insert(item_id.to_string());
        Ok(())
    }

    /// Returns whether the item was equipped.
    pub fn unequip(&mut self, item_id: &str) -> bool {
        self.equipped.remove(item_id)
    }

    /// Pays the sign-in reward once per calendar day. Returns the coins paid.
    pub fn daily_signin(&mut self, today: NaiveDate) -> u32 {
        if self.last_signin == Some(today) {
            return 0;
        }
        self.last_signin = Some(today);
        self.add_coins(DAILY_SIGNIN_REWARD);
        DAILY_SIGNIN_REWARD
    }

    pub fn to_ron(&self) -> ProgressResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|err| ProgressError::Encode(err.to_string()))
    }

    pub fn from_ron(text: &str) -> ProgressResult<Self> {
        ron::from_str(text).map_err(|err| ProgressError::Decode(err.to_string()))
    }
}

impl ProgressStore for InMemoryProgress {
    fn equipped_items(&self) -> Vec<String> {
        self.equipped.iter().cloned().collect()
    }

    fn record_outcome(&mut self, outcome: &MatchOutcome) {
        if outcome.winner != FighterSlot::PlayerOne {
            return;
        }

        self.add_coins(outcome.reward);
        match outcome.mode {
            GameMode::Boss(_) => self.boss_defeats += 1,
            GameMode::VsAi(_) | GameMode::VsPlayer => self.total_wins += 1,
            GameMode::Training(_) => {}
        }
    }
}
