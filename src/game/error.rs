use super::Range;

/// Game actions that are refused. Rendered verbatim into `game-error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    NotInRoom,
    NotEnoughPlayers(usize),
    AlreadyActive,
    NoGame,
    NotWaiting,
    NotInteger(String),
    OutOfRange(Range),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInRoom => write!(f, "join a room before playing"),
            Self::NotEnoughPlayers(n) => write!(
                f,
                "at least {} players are needed to start, room has {}",
                crate::MIN_PLAYERS,
                n
            ),
            Self::AlreadyActive => write!(f, "a game is already in progress"),
            Self::NoGame => write!(f, "no game in progress"),
            Self::NotWaiting => write!(f, "you are not expected to guess this round"),
            Self::NotInteger(s) => write!(f, "guess must be a whole number, got {}", s),
            Self::OutOfRange(r) => write!(
                f,
                "guess must be between {} and {}",
                r.min, r.max
            ),
        }
    }
}

impl std::error::Error for GameError {}
