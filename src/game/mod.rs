//! Number Bomb: a round-based bisection guessing game played inside a room.
//!
//! A bomb hides behind a number in `[1, 100]`. Every round each member guesses
//! once within the current range; when all have guessed, a guess that hits the
//! bomb ends the game, otherwise the range shrinks around it and a new round
//! begins.
//!
//! ## Core Types
//!
//! - [`NumberBomb`]: Session state machine for one room
//! - [`Range`]: Inclusive bounds guesses must fall within
//! - [`Resolution`]: Result of resolving a complete round
//! - [`GameError`]: Rejected game actions, reported only to the actor
mod bomb;
mod error;
mod range;

pub use bomb::*;
pub use error::*;
pub use range::*;
