//! Per-tick logical input snapshot.
//!
//! Маппинг клавиш → действия — забота хоста. Симуляция видит только булевы
//! флаги на текущий кадр.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub punch: bool,
    pub kick: bool,
    pub block: bool,
    pub special: bool,
    pub ultimate: bool,
}

impl InputSnapshot {
    /// -1 / 0 / +1. Right wins when both directions are held.
    pub fn horizontal(&self) -> i8 {
        if self.right {
            1
        } else if self.left {
            -1
        } else {
            0
        }
    }
}
