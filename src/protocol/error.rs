/// Reasons an inbound frame is dropped before dispatch.
/// None of these are reported to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Unparsable(String),
    UnknownType(String),
    InvalidData(&'static str, String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unparsable(s) => write!(f, "unparsable envelope: {}", s),
            Self::UnknownType(t) => write!(f, "unknown message type: {}", t),
            Self::InvalidData(t, s) => write!(f, "invalid {} data: {}", t, s),
        }
    }
}

impl std::error::Error for ProtocolError {}
