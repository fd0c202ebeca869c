//! Core game logic: the data model, pure betting rules, turn sequencing,
//! the action state machine, and the round lifecycle.
//!
//! Everything in this module is a pure value computation; persistence and
//! concurrency live behind [`crate::store`].

pub mod actions;
pub mod entities;
pub mod errors;
pub mod round;
pub mod rules;
pub mod turns;

pub use actions::{Action, SideShowResolution, Transition};
pub use errors::{GameError, GameResult};
