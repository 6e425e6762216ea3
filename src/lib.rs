//! Rendezvous and signaling relay for small multi-party voice rooms.
//!
//! Browser clients connect over a single WebSocket, join a named room under a
//! username, and then exchange opaque WebRTC negotiation payloads, chat, and
//! moves of a small synchronous guessing game. Media never passes through here.
//!
//! ## Modules
//!
//! - [`protocol`]: Wire envelope, client requests and server messages
//! - [`peers`]: Connection handles and the process-wide peer registry
//! - [`rooms`]: Room membership and the room directory
//! - [`game`]: Number Bomb round engine
//! - [`presence`]: External room-presence mirrors
//! - [`hosting`]: Hub, WebSocket bridge and HTTP server
pub mod game;
pub mod hosting;
pub mod peers;
pub mod presence;
pub mod protocol;
pub mod rooms;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// A player's guess, and the bounds of the range it must fall within.
pub type Number = i64;
/// Round counter within one game session (starts at 1).
pub type Round = u32;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> TryFrom<&str> for ID<T> {
    type Error = uuid::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        uuid::Uuid::parse_str(s).map(Self::from)
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.inner)
    }
}

// ============================================================================
// WIRE PARAMETERS
// ============================================================================
/// Path of the WebSocket upgrade endpoint.
pub const WS_PATH: &str = "/ws";
/// Close reason sent after a rejected join.
pub const USERNAME_TAKEN_REASON: &str = "username taken";

// ============================================================================
// NUMBER BOMB PARAMETERS
// ============================================================================
/// Tag reported in game state updates.
pub const GAME_TYPE: &str = "number-bomb";
/// Lowest number the bomb can hide behind.
pub const BOMB_MIN: Number = 1;
/// Highest number the bomb can hide behind.
pub const BOMB_MAX: Number = 100;
/// Members required to start (and keep) a game.
pub const MIN_PLAYERS: usize = 2;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Writes DEBUG level to `<dir>/<unix-time>.log`, INFO to terminal.
pub fn log(dir: &std::path::Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(dir.join(format!("{}.log", time)))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
/// Rooms live in memory only, so there is nothing to flush.
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}
