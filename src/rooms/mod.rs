//! Named rooms and the directory that owns them.
//!
//! Each [`Room`] sits behind its own lock inside the [`Directory`], so every
//! read-then-write sequence on one room is serialized while unrelated rooms
//! proceed in parallel.
mod directory;
mod member;
mod room;

pub use directory::*;
pub use member::*;
pub use room::*;
