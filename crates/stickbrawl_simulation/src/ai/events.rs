//! AI Events — события boss overlay для внешних коллабораторов
//!
//! Эффекты (огонь, щит, лёд) рисует хост; симуляция только сообщает,
//! что произошло.

use bevy::prelude::*;

use crate::config::BossAbility;

/// Босс перешёл в rage (ровно один раз за матч)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RageTriggered {
    pub boss: Entity,
}

/// Босс применил special ability
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossAbilityUsed {
    pub boss: Entity,
    pub ability: BossAbility,
}
