//! Fighter identity: слот игрока и ссылка на оппонента.

use bevy::prelude::*;

/// Which side of the match a fighter occupies.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
#[reflect(Component)]
pub enum FighterSlot {
    PlayerOne,
    PlayerTwo,
}

impl FighterSlot {
    pub fn other(&self) -> Self {
        match self {
            FighterSlot::PlayerOne => FighterSlot::PlayerTwo,
            FighterSlot::PlayerTwo => FighterSlot::PlayerOne,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FighterSlot::PlayerOne => "P1",
            FighterSlot::PlayerTwo => "P2",
        }
    }
}

/// The entity this fighter observes and targets.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opponent(pub Entity);
