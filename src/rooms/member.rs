use crate::peers::Connection;
use crate::peers::PeerId;
use crate::protocol::PeerInfo;

/// A room's view of one of its peers: id, the name it joined under, and a
/// handle to reach it. The peer itself lives in the registry.
#[derive(Debug, Clone)]
pub struct Member {
    pub peer: PeerId,
    pub username: String,
    pub connection: Connection,
}

impl Member {
    pub fn info(&self) -> PeerInfo {
        PeerInfo {
            peer_id: self.peer,
            username: self.username.clone(),
        }
    }
}
