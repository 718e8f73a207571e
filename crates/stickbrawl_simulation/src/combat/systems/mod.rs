//! Combat systems

pub mod fighter;
pub mod hits;

pub use fighter::*;
pub use hits::*;
