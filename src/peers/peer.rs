use super::*;
use crate::ID;
use crate::Unique;

/// Identifier assigned to a connection when it is accepted.
pub type PeerId = ID<Peer>;

/// One connected client.
///
/// Username and room are set together, once, when a join succeeds.
/// Rooms refer back to peers by id only.
#[derive(Debug)]
pub struct Peer {
    id: PeerId,
    connection: Connection,
    membership: Option<Membership>,
}

/// The room a peer joined and the name it joined under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room: String,
    pub username: String,
}

impl Peer {
    pub fn new(id: PeerId, connection: Connection) -> Self {
        Self {
            id,
            connection,
            membership: None,
        }
    }
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
    pub fn membership(&self) -> Option<&Membership> {
        self.membership.as_ref()
    }
    pub fn room(&self) -> Option<&str> {
        self.membership.as_ref().map(|m| m.room.as_str())
    }
    pub fn username(&self) -> Option<&str> {
        self.membership.as_ref().map(|m| m.username.as_str())
    }
    /// Records a successful join. Returns false if the peer already joined.
    pub fn enter(&mut self, room: &str, username: &str) -> bool {
        match self.membership {
            Some(_) => false,
            None => {
                self.membership = Some(Membership {
                    room: room.to_string(),
                    username: username.to_string(),
                });
                true
            }
        }
    }
}

impl Unique for Peer {
    fn id(&self) -> PeerId {
        self.id
    }
}
