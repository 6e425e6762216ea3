use super::*;
use crate::Number;
use crate::Round;
use crate::game::Range;
use crate::peers::PeerId;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use std::collections::BTreeMap;

/// Messages sent from server to client over WebSocket.
/// Serialized as `{ "type": "<kebab-case variant>", "data": {...} }`.
#[derive(Clone, Debug, Serialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// Identity assignment. Peers are only enumerated once a room is joined.
    YourId {
        peer_id: PeerId,
        #[serde(skip_serializing_if = "Option::is_none")]
        peers: Option<Vec<PeerInfo>>,
    },
    /// Someone joined the recipient's room.
    NewPeer(PeerInfo),
    /// Join rejected; the connection closes right after.
    UsernameTaken { username: String },
    /// Relayed negotiation payloads, annotated with the sender.
    Offer(Map<String, Value>),
    Answer(Map<String, Value>),
    IceCandidate(Map<String, Value>),
    ChatMessage {
        sender_id: PeerId,
        sender_username: String,
        message: String,
    },
    PeerDisconnected {
        peer_id: PeerId,
        username: String,
    },
    GameStateUpdate {
        game_active: bool,
        game_type: &'static str,
        current_range: Range,
        round: Round,
        waiting_for_guesses: Vec<PeerInfo>,
        total_players: usize,
    },
    PlayerGuessed {
        player_username: String,
        waiting_count: usize,
        total_players: usize,
    },
    GameRoundResult {
        current_range: Range,
        round: Round,
        guesses: BTreeMap<String, Number>,
        waiting_for_guesses: Vec<PeerInfo>,
    },
    GameEnd(GameEnd),
    GameError { message: String },
    PlayerDisconnectedDuringGame {
        disconnected_username: String,
        waiting_count: usize,
        total_players: usize,
    },
}

/// A room member as other members see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    pub peer_id: PeerId,
    pub username: String,
}

/// How a game session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Explosion,
    InsufficientPlayers,
}

/// Final report of a game session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEnd {
    pub result: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploded_player: Option<PeerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploded_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bomb_number: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guesses: Option<BTreeMap<String, Number>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GameEnd {
    pub fn explosion(
        peer: PeerId,
        username: String,
        bomb: Number,
        guesses: BTreeMap<String, Number>,
    ) -> Self {
        Self {
            result: Outcome::Explosion,
            exploded_player: Some(peer),
            exploded_username: Some(username),
            bomb_number: Some(bomb),
            guesses: Some(guesses),
            message: None,
        }
    }
    pub fn insufficient_players(bomb: Number) -> Self {
        Self {
            result: Outcome::InsufficientPlayers,
            exploded_player: None,
            exploded_username: None,
            bomb_number: Some(bomb),
            guesses: None,
            message: Some("not enough players left, game over".to_string()),
        }
    }
}

impl ServerMessage {
    pub fn your_id(peer_id: PeerId) -> Self {
        Self::YourId {
            peer_id,
            peers: None,
        }
    }
    pub fn welcome(peer_id: PeerId, peers: Vec<PeerInfo>) -> Self {
        Self::YourId {
            peer_id,
            peers: Some(peers),
        }
    }
    pub fn relay(kind: SignalKind, payload: Map<String, Value>) -> Self {
        match kind {
            SignalKind::Offer => Self::Offer(payload),
            SignalKind::Answer => Self::Answer(payload),
            SignalKind::IceCandidate => Self::IceCandidate(payload),
        }
    }
    pub fn game_error(message: impl ToString) -> Self {
        Self::GameError {
            message: message.to_string(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}
