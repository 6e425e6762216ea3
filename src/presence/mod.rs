//! Mirrors of room occupancy kept outside this process.
//!
//! The hub reports every membership change to a [`PresenceSink`] through a
//! [`Mirror`], which applies them in order. Sinks are fire-and-forget: their
//! failures are logged and never reach clients.
mod logged;
mod memory;
mod mirror;
#[cfg(feature = "database")]
mod postgres;
mod sink;

pub use logged::*;
pub use memory::*;
pub use mirror::*;
#[cfg(feature = "database")]
pub use postgres::*;
pub use sink::*;
