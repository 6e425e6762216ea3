//! WebSocket hosting for rooms.
//!
//! ## Core Types
//!
//! - [`Hub`]: Owns the peer registry, room directory and presence sink;
//!   applies every client request
//! - [`bridge`]: Per-connection loop pumping frames between socket and hub
//! - [`Server`]: actix-web server exposing `/ws`, `/health` and static files
//! - [`Config`]: Command line and environment configuration
mod assets;
mod bridge;
mod config;
mod hub;
mod server;

pub use assets::*;
pub use bridge::*;
pub use config::*;
pub use hub::*;
pub use server::*;
