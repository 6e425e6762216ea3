use super::*;
use crate::BOMB_MAX;
use crate::BOMB_MIN;
use crate::Number;
use crate::Round;
use crate::peers::PeerId;
use crate::protocol::GameEnd;
use crate::protocol::PeerInfo;
use crate::protocol::ServerMessage;
use rand::Rng;
use serde_json::Value;
use std::collections::BTreeMap;

/// One recorded guess, kept in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub peer: PeerId,
    pub username: String,
    pub value: Number,
}

/// What a complete round turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Someone hit the bomb. The session is over.
    Exploded(GameEnd),
    /// Everyone missed. The range shrank and the next round is open.
    Continued {
        range: Range,
        round: Round,
        guesses: BTreeMap<String, Number>,
        waiting: Vec<PeerInfo>,
    },
}

/// Number Bomb session for one room.
///
/// Tracks the hidden bomb, the current range, who guessed what this round and
/// who is still expected to guess. The bomb never moves once drawn.
#[derive(Debug, Clone)]
pub struct NumberBomb {
    bomb: Number,
    range: Range,
    round: Round,
    guesses: Vec<Entry>,
    waiting: Vec<PeerInfo>,
}

impl NumberBomb {
    /// Opens round 1 with every given player expected to guess.
    pub fn new(bomb: Number, players: Vec<PeerInfo>) -> Self {
        debug_assert!(Range::default().contains(bomb));
        Self {
            bomb,
            range: Range::default(),
            round: 1,
            guesses: Vec::new(),
            waiting: players,
        }
    }
    /// Same as [`NumberBomb::new`] with a uniformly drawn bomb.
    pub fn random(players: Vec<PeerInfo>) -> Self {
        Self::new(Self::draw(), players)
    }
    /// Uniform draw over the full board.
    pub fn draw() -> Number {
        rand::rng().random_range(BOMB_MIN..=BOMB_MAX)
    }
    pub fn bomb(&self) -> Number {
        self.bomb
    }
    pub fn range(&self) -> Range {
        self.range
    }
    pub fn round(&self) -> Round {
        self.round
    }
    pub fn guesses(&self) -> &[Entry] {
        &self.guesses
    }
    pub fn waiting(&self) -> &[PeerInfo] {
        &self.waiting
    }
    pub fn is_waiting(&self, peer: PeerId) -> bool {
        self.waiting.iter().any(|p| p.peer_id == peer)
    }
    /// Every expected player has guessed.
    pub fn is_complete(&self) -> bool {
        self.waiting.is_empty()
    }
}

impl NumberBomb {
    /// Records a guess from a player still expected this round.
    /// Returns how many players are still expected afterwards.
    pub fn guess(&mut self, peer: PeerId, value: &Value) -> Result<usize, GameError> {
        let pos = self
            .waiting
            .iter()
            .position(|p| p.peer_id == peer)
            .ok_or(GameError::NotWaiting)?;
        let value = Self::parse(value)?;
        if !self.range.contains(value) {
            return Err(GameError::OutOfRange(self.range));
        }
        let player = self.waiting.remove(pos);
        self.guesses.push(Entry {
            peer,
            username: player.username,
            value,
        });
        Ok(self.waiting.len())
    }
    /// Drops a departed player from this round, guessed or not.
    /// Returns true if the player had not guessed yet.
    pub fn forfeit(&mut self, peer: PeerId) -> bool {
        self.guesses.retain(|e| e.peer != peer);
        let before = self.waiting.len();
        self.waiting.retain(|p| p.peer_id != peer);
        before != self.waiting.len()
    }
    /// Closes the current round.
    ///
    /// The first recorded guess equal to the bomb explodes, so simultaneous
    /// hits resolve by submission order. Otherwise the range narrows and
    /// `players` become the waiting set of the next round.
    pub fn resolve(&mut self, players: Vec<PeerInfo>) -> Resolution {
        let guesses = self.board();
        match self.guesses.iter().find(|e| e.value == self.bomb) {
            Some(hit) => Resolution::Exploded(GameEnd::explosion(
                hit.peer,
                hit.username.clone(),
                self.bomb,
                guesses,
            )),
            None => {
                self.range = self
                    .range
                    .narrow(self.bomb, self.guesses.iter().map(|e| e.value));
                self.round += 1;
                self.guesses.clear();
                self.waiting = players;
                Resolution::Continued {
                    range: self.range,
                    round: self.round,
                    guesses,
                    waiting: self.waiting.clone(),
                }
            }
        }
    }
}

impl NumberBomb {
    fn board(&self) -> BTreeMap<String, Number> {
        self.guesses
            .iter()
            .map(|e| (e.username.clone(), e.value))
            .collect()
    }
    fn parse(value: &Value) -> Result<Number, GameError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as Number)),
            Value::String(s) => s.trim().parse::<Number>().ok(),
            _ => None,
        }
        .ok_or_else(|| GameError::NotInteger(value.to_string()))
    }
}

impl From<Resolution> for ServerMessage {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Exploded(end) => ServerMessage::GameEnd(end),
            Resolution::Continued {
                range,
                round,
                guesses,
                waiting,
            } => ServerMessage::GameRoundResult {
                current_range: range,
                round,
                guesses,
                waiting_for_guesses: waiting,
            },
        }
    }
}
