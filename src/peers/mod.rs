//! Connected clients and the handles used to reach them.
//!
//! - [`Connection`]: Outbound half of one client socket
//! - [`Peer`]: One connected client and its room membership
//! - [`Registry`]: Process-wide map from peer id to peer
mod connection;
mod peer;
mod registry;

pub use connection::*;
pub use peer::*;
pub use registry::*;
