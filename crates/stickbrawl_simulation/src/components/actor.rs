//! Базовые vitals бойца: Health, Energy

use bevy::prelude::*;

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Changes `max`, keeping the current/max ratio (truncated).
    pub fn rescale_max(&mut self, new_max: u32) {
        let ratio = self.ratio();
        self.max = new_max;
        self.current = ((new_max as f32 * ratio) as u32).min(new_max);
    }
}

/// Энергия для kick/special/ultimate
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Regen: per frame (не per second — симуляция считает кадры)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Energy {
    pub current: f32,
    pub max: f32,
    pub regen_per_frame: f32,
}

impl Default for Energy {
    fn default() -> Self {
        Self::new(100.0, 0.5)
    }
}

impl Energy {
    pub fn new(max: f32, regen_per_frame: f32) -> Self {
        Self {
            current: max,
            max,
            regen_per_frame,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    pub fn consume(&mut self, cost: f32) -> bool {
        if self.can_afford(cost) {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    pub fn regenerate(&mut self) {
        self.restore(self.regen_per_frame);
    }
}
