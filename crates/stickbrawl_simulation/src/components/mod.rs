//! ECS components бойца
//!
//! - actor: vitals (Health, Energy)
//! - body: side-view kinematics (Body, Facing, hurtbox)
//! - fighter: identity (FighterSlot, Opponent)

pub mod actor;
pub mod body;
pub mod fighter;

pub use actor::*;
pub use body::*;
pub use fighter::*;
