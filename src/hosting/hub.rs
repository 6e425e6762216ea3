use crate::Number;
use crate::USERNAME_TAKEN_REASON;
use crate::Unique;
use crate::game::GameError;
use crate::game::NumberBomb;
use crate::peers::Connection;
use crate::peers::Frame;
use crate::peers::PeerId;
use crate::peers::Registry;
use crate::presence::LogSink;
use crate::presence::Mirror;
use crate::presence::PresenceSink;
use crate::protocol::Chat;
use crate::protocol::Guess;
use crate::protocol::Join;
use crate::protocol::Request;
use crate::protocol::ServerMessage;
use crate::protocol::Signal;
use crate::protocol::SignalKind;
use crate::rooms::Directory;
use crate::rooms::Room;
use crate::rooms::RoomHandle;
use std::sync::Arc;
use tokio::sync::MutexGuard;
use tokio::sync::mpsc::UnboundedReceiver;

/// Process-wide coordination state.
///
/// Created once at startup and shared by every connection task; dropped at
/// shutdown. Rooms are locked one at a time and never while the directory
/// waits on them from the other side, so unrelated rooms run in parallel.
pub struct Hub {
    peers: Registry,
    rooms: Directory,
    mirror: Mirror,
    draw: fn() -> Number,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

impl Hub {
    /// Must be called within a tokio runtime; it starts the presence mirror.
    pub fn new(sink: Arc<dyn PresenceSink>) -> Self {
        Self {
            peers: Registry::default(),
            rooms: Directory::default(),
            mirror: Mirror::spawn(sink),
            draw: NumberBomb::draw,
        }
    }
    /// Replaces how bombs are placed when a game starts.
    pub fn with_draw(self, draw: fn() -> Number) -> Self {
        Self { draw, ..self }
    }
    pub fn peers(&self) -> &Registry {
        &self.peers
    }
    pub fn rooms(&self) -> &Directory {
        &self.rooms
    }
}

impl Hub {
    /// Accepts a new connection: assigns an id, registers the peer and tells
    /// it its id. Returns the receiver the socket task must drain.
    pub async fn connect(&self) -> (PeerId, UnboundedReceiver<Frame>) {
        let (connection, outbox) = Connection::pair();
        let peer = self.peers.register(connection.clone()).await;
        connection.send(&ServerMessage::your_id(peer));
        log::info!("[+] peer connected: {}", peer);
        (peer, outbox)
    }

    /// Handles one inbound text frame. Malformed input is logged and dropped.
    pub async fn dispatch(&self, peer: PeerId, text: &str) {
        match Request::decode(text) {
            Ok(request) => self.handle(peer, request).await,
            Err(e) => log::warn!("dropping message from {}: {}", peer, e),
        }
    }

    pub async fn handle(&self, peer: PeerId, request: Request) {
        match request {
            Request::JoinRoom(join) => self.join(peer, join).await,
            Request::Signal(kind, signal) => self.signal(peer, kind, signal).await,
            Request::Chat(chat) => self.chat(peer, chat).await,
            Request::StartNumberBomb => self.start(peer).await,
            Request::SubmitGuess(guess) => self.guess(peer, guess).await,
        }
    }

    /// Tears a peer down: leaves its room, settles any game there, and drops
    /// the room if it emptied. Safe to call more than once; only the first
    /// call does anything.
    pub async fn disconnect(&self, peer: PeerId) {
        let Some(gone) = self.peers.remove(peer).await else {
            return;
        };
        log::info!("[-] peer disconnected: {}", gone.id());
        let Some(membership) = gone.membership() else {
            return;
        };
        let Some(handle) = self.rooms.get(&membership.room).await else {
            return;
        };
        let mut room = handle.lock().await;
        room.depart(peer);
        self.settle(&membership.room, room).await;
    }
}

impl Hub {
    async fn join(&self, peer: PeerId, Join { room_name, username }: Join) {
        let Some(connection) = self.peers.connection(peer).await else {
            return;
        };
        if let Some(current) = self.peers.membership(peer).await {
            log::warn!("{} already in [{}], ignoring join", peer, current.room);
            return;
        }
        loop {
            let handle = self.rooms.open(&room_name).await;
            let mut room = handle.lock().await;
            if room.is_closed() {
                continue;
            }
            let admitted = room.admit(peer, &username, connection.clone());
            match admitted {
                Ok(_) => self.enroll(peer, &room_name, &username, room).await,
                Err(taken) => {
                    log::info!("[{}] rejected {}: {}", room_name, peer, taken);
                    connection.send(&ServerMessage::UsernameTaken { username });
                    connection.close(USERNAME_TAKEN_REASON);
                }
            }
            return;
        }
    }

    /// Records the membership of a peer its room just admitted. A peer torn
    /// down in the meantime had no room to leave, so it is evicted here.
    async fn enroll(
        &self,
        peer: PeerId,
        name: &str,
        username: &str,
        mut room: MutexGuard<'_, Room>,
    ) {
        if !self.peers.enter(peer, name, username).await {
            log::debug!("[{}] {} left while joining", name, peer);
            room.depart(peer);
        }
        self.settle(name, room).await;
    }

    /// Reports a room's new size, or drops the room once it is empty.
    /// The upsert is queued under the room lock and the delete under the
    /// directory lock, so the mirror sees changes in the order rooms did.
    async fn settle(&self, name: &str, room: MutexGuard<'_, Room>) {
        if !room.is_empty() {
            self.mirror.upsert(name, room.len());
            return;
        }
        drop(room);
        self.rooms
            .close_if_empty(name, || self.mirror.delete(name))
            .await;
    }

    async fn signal(&self, peer: PeerId, kind: SignalKind, signal: Signal) {
        let Signal {
            target,
            room_name,
            mut payload,
        } = signal;
        let Some(membership) = self.peers.membership(peer).await else {
            log::debug!("dropping {} from {}: not in a room", kind, peer);
            return;
        };
        if room_name.as_ref().is_some_and(|r| *r != membership.room) {
            log::debug!("dropping {} from {}: addressed outside its room", kind, peer);
            return;
        }
        let Ok(addressee) = PeerId::try_from(target.as_str()) else {
            log::debug!("dropping {} from {}: bad target {}", kind, peer, target);
            return;
        };
        let Some(handle) = self.rooms.get(&membership.room).await else {
            return;
        };
        payload.insert("target".to_string(), target.into());
        if let Some(room_name) = room_name {
            payload.insert("roomName".to_string(), room_name.into());
        }
        payload.insert("senderId".to_string(), peer.to_string().into());
        payload.insert("senderUsername".to_string(), membership.username.into());
        let relayed = ServerMessage::relay(kind, payload);
        if !handle.lock().await.unicast(addressee, &relayed) {
            log::debug!("dropping {} from {}: {} not reachable", kind, peer, addressee);
        }
    }

    async fn chat(&self, peer: PeerId, Chat { message }: Chat) {
        let Some(membership) = self.peers.membership(peer).await else {
            return;
        };
        let Some(handle) = self.rooms.get(&membership.room).await else {
            return;
        };
        handle.lock().await.broadcast(
            ServerMessage::ChatMessage {
                sender_id: peer,
                sender_username: membership.username,
                message,
            },
            Some(peer),
        );
    }

    async fn start(&self, peer: PeerId) {
        let Some(handle) = self.room_of(peer).await else {
            return;
        };
        let mut room = handle.lock().await;
        if let Err(e) = room.start_game((self.draw)()) {
            log::debug!("[{}] start refused for {}: {}", room.name(), peer, e);
            room.unicast(peer, &ServerMessage::game_error(e));
        }
    }

    async fn guess(&self, peer: PeerId, Guess { guess }: Guess) {
        let Some(handle) = self.room_of(peer).await else {
            return;
        };
        let mut room = handle.lock().await;
        if let Err(e) = room.submit_guess(peer, &guess) {
            log::debug!("[{}] guess refused for {}: {}", room.name(), peer, e);
            room.unicast(peer, &ServerMessage::game_error(e));
        }
    }

    /// Room of a game actor. A peer outside any room is told so directly.
    async fn room_of(&self, peer: PeerId) -> Option<RoomHandle> {
        match self.peers.membership(peer).await {
            Some(membership) => self.rooms.get(&membership.room).await,
            None => {
                if let Some(connection) = self.peers.connection(peer).await {
                    connection.send(&ServerMessage::game_error(GameError::NotInRoom));
                }
                None
            }
        }
    }
}
