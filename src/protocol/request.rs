use super::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

/// Raw `{ type, data }` envelope before the payload is interpreted.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Messages sent from client to server over WebSocket.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    JoinRoom(Join),
    Signal(SignalKind, Signal),
    Chat(Chat),
    StartNumberBomb,
    SubmitGuess(Guess),
}

/// `join-room` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    pub room_name: String,
    pub username: String,
}

/// `offer`, `answer` and `ice-candidate` share one shape: an addressed,
/// otherwise opaque payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub target: String,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// `chat-message` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub message: String,
}

/// `submit-guess` payload. The guess stays untyped until the game checks it,
/// so that a non-numeric guess earns a game error instead of a silent drop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Guess {
    pub guess: Value,
}

/// Which WebRTC negotiation step a signal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Request {
    /// Parses one inbound text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let Envelope { kind, data } = serde_json::from_str::<Envelope>(text)
            .map_err(|e| ProtocolError::Unparsable(e.to_string()))?;
        match kind.as_str() {
            "join-room" => Self::data::<Join>("join-room", data)
                .and_then(Join::validated)
                .map(Self::JoinRoom),
            "offer" => Self::data("offer", data).map(|s| Self::Signal(SignalKind::Offer, s)),
            "answer" => Self::data("answer", data).map(|s| Self::Signal(SignalKind::Answer, s)),
            "ice-candidate" => Self::data("ice-candidate", data)
                .map(|s| Self::Signal(SignalKind::IceCandidate, s)),
            "chat-message" => Self::data("chat-message", data).map(Self::Chat),
            "start-number-bomb" => Ok(Self::StartNumberBomb),
            "submit-guess" => Self::data("submit-guess", data).map(Self::SubmitGuess),
            _ => Err(ProtocolError::UnknownType(kind)),
        }
    }
    fn data<T>(kind: &'static str, data: Value) -> Result<T, ProtocolError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(data).map_err(|e| ProtocolError::InvalidData(kind, e.to_string()))
    }
}

impl Join {
    fn validated(self) -> Result<Self, ProtocolError> {
        match (self.room_name.trim().is_empty(), self.username.trim().is_empty()) {
            (true, _) => Err(ProtocolError::InvalidData("join-room", "empty roomName".into())),
            (_, true) => Err(ProtocolError::InvalidData("join-room", "empty username".into())),
            _ => Ok(self),
        }
    }
}
