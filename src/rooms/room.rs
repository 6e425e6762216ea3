use super::*;
use crate::MIN_PLAYERS;
use crate::Number;
use crate::game::GameError;
use crate::game::NumberBomb;
use crate::game::Resolution;
use crate::peers::Connection;
use crate::peers::PeerId;
use crate::protocol::GameEnd;
use crate::protocol::PeerInfo;
use crate::protocol::ServerMessage;
use serde_json::Value;

/// Join refused because the name is in use by a current member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameTaken(pub String);

impl std::fmt::Display for UsernameTaken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "username {} is taken", self.0)
    }
}

impl std::error::Error for UsernameTaken {}

/// A named group of peers plus its optional game session.
///
/// Members are kept in join order. Usernames are unique among current
/// members. Every method runs under the room's lock, so membership checks and
/// the writes that depend on them happen atomically.
#[derive(Debug)]
pub struct Room {
    name: String,
    members: Vec<Member>,
    game: Option<NumberBomb>,
    closed: bool,
}

impl Room {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: Vec::new(),
            game: None,
            closed: false,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn game(&self) -> Option<&NumberBomb> {
        self.game.as_ref()
    }
    pub fn member(&self, peer: PeerId) -> Option<&Member> {
        self.members.iter().find(|m| m.peer == peer)
    }
    pub fn players(&self) -> Vec<PeerInfo> {
        self.members.iter().map(Member::info).collect()
    }
    /// Set once the directory has dropped this room; nobody may join it.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.game = None;
    }
}

impl Room {
    /// Adds a peer under `username`.
    ///
    /// The newcomer first receives its id with the members already present,
    /// then everyone else hears about the newcomer. A taken name changes
    /// nothing and sends nothing. Returns the new member count.
    pub fn admit(
        &mut self,
        peer: PeerId,
        username: &str,
        connection: Connection,
    ) -> Result<usize, UsernameTaken> {
        if self.members.iter().any(|m| m.username == username) {
            return Err(UsernameTaken(username.to_string()));
        }
        let member = Member {
            peer,
            username: username.to_string(),
            connection,
        };
        member
            .connection
            .send(&ServerMessage::welcome(peer, self.players()));
        self.members.push(member);
        self.broadcast(
            ServerMessage::NewPeer(PeerInfo {
                peer_id: peer,
                username: username.to_string(),
            }),
            Some(peer),
        );
        log::info!("[{}] {} joined as {}, total {}", self.name, peer, username, self.len());
        Ok(self.len())
    }

    /// Removes a peer and settles any game it was part of.
    ///
    /// An active game ends if fewer than [`MIN_PLAYERS`] remain, resolves the
    /// round if the leaver was the last one awaited, and otherwise tells
    /// everyone who is still awaited. Remaining members are then told the
    /// peer is gone.
    pub fn depart(&mut self, peer: PeerId) -> Option<Member> {
        let pos = self.members.iter().position(|m| m.peer == peer)?;
        let member = self.members.remove(pos);
        log::info!("[{}] {} left, total {}", self.name, member.username, self.len());
        if let Some(game) = self.game.as_mut() {
            game.forfeit(peer);
            if self.members.len() < MIN_PLAYERS {
                let bomb = game.bomb();
                self.game = None;
                log::info!("[{}] game over, not enough players", self.name);
                self.broadcast(
                    ServerMessage::GameEnd(GameEnd::insufficient_players(bomb)),
                    None,
                );
            } else if game.is_complete() {
                self.resolve();
            } else {
                let waiting = game.waiting().len();
                self.broadcast(
                    ServerMessage::PlayerDisconnectedDuringGame {
                        disconnected_username: member.username.clone(),
                        waiting_count: waiting,
                        total_players: self.len(),
                    },
                    None,
                );
            }
        }
        self.broadcast(
            ServerMessage::PeerDisconnected {
                peer_id: peer,
                username: member.username.clone(),
            },
            None,
        );
        Some(member)
    }
}

impl Room {
    /// Starts a Number Bomb session hiding the bomb at `bomb`.
    pub fn start_game(&mut self, bomb: Number) -> Result<(), GameError> {
        if self.game.is_some() {
            return Err(GameError::AlreadyActive);
        }
        if self.members.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(self.members.len()));
        }
        let game = NumberBomb::new(bomb, self.players());
        let update = ServerMessage::GameStateUpdate {
            game_active: true,
            game_type: crate::GAME_TYPE,
            current_range: game.range(),
            round: game.round(),
            waiting_for_guesses: game.waiting().to_vec(),
            total_players: self.len(),
        };
        self.game = Some(game);
        log::info!("[{}] number bomb started with {} players", self.name, self.len());
        self.broadcast(update, None);
        Ok(())
    }

    /// Records a guess, announces it, and resolves the round once nobody is
    /// left to guess.
    pub fn submit_guess(&mut self, peer: PeerId, value: &Value) -> Result<(), GameError> {
        let game = self.game.as_mut().ok_or(GameError::NoGame)?;
        let waiting = game.guess(peer, value)?;
        let complete = game.is_complete();
        let username = self
            .member(peer)
            .map(|m| m.username.clone())
            .unwrap_or_default();
        self.broadcast(
            ServerMessage::PlayerGuessed {
                player_username: username,
                waiting_count: waiting,
                total_players: self.len(),
            },
            None,
        );
        if complete {
            self.resolve();
        }
        Ok(())
    }

    fn resolve(&mut self) {
        let players = self.players();
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let resolution = game.resolve(players);
        match resolution {
            Resolution::Exploded(ref end) => {
                self.game = None;
                log::info!(
                    "[{}] bomb {:?} hit by {:?}",
                    self.name,
                    end.bomb_number,
                    end.exploded_username
                );
            }
            Resolution::Continued { range, round, .. } => {
                log::debug!("[{}] round {} narrowed to {}", self.name, round, range)
            }
        }
        self.broadcast(ServerMessage::from(resolution), None);
    }
}

impl Room {
    /// Sends to one member. False if it is not a member or its socket is gone.
    pub fn unicast(&self, peer: PeerId, msg: &ServerMessage) -> bool {
        self.member(peer)
            .map(|m| m.connection.send(msg))
            .unwrap_or(false)
    }
    /// Sends to every member except `except`. A failed send is logged and
    /// does not stop the others.
    pub fn broadcast(&self, msg: ServerMessage, except: Option<PeerId>) {
        self.members
            .iter()
            .filter(|m| Some(m.peer) != except)
            .filter(|m| !m.connection.send(&msg))
            .for_each(|m| log::warn!("[{}] failed broadcast to {}", self.name, m.peer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::Frame;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn inbox(rx: &mut UnboundedReceiver<Frame>) -> Vec<Value> {
        std::iter::from_fn(|| rx.try_recv().ok())
            .filter_map(|f| match f {
                Frame::Text(t) => serde_json::from_str(&t).ok(),
                Frame::Close(_) => None,
            })
            .collect()
    }
    fn types(rx: &mut UnboundedReceiver<Frame>) -> Vec<String> {
        inbox(rx)
            .into_iter()
            .map(|v| v["type"].as_str().unwrap_or_default().to_string())
            .collect()
    }
    fn join(room: &mut Room, name: &str) -> (PeerId, UnboundedReceiver<Frame>) {
        let (conn, rx) = Connection::pair();
        let id = PeerId::default();
        room.admit(id, name, conn).unwrap();
        (id, rx)
    }

    #[test]
    fn first_member_sees_empty_room() {
        let mut room = Room::new("r1");
        let (_, mut rx) = join(&mut room, "alice");
        let msgs = inbox(&mut rx);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0]["type"], "your-id");
        assert_eq!(msgs[0]["data"]["peers"], json!([]));
    }
    #[test]
    fn newcomer_sees_existing_and_existing_see_newcomer() {
        let mut room = Room::new("r1");
        let (a, mut ra) = join(&mut room, "alice");
        inbox(&mut ra);
        let (b, mut rb) = join(&mut room, "bob");
        let welcome = inbox(&mut rb);
        assert_eq!(welcome.len(), 1);
        assert_eq!(welcome[0]["data"]["peerId"], b.to_string());
        assert_eq!(welcome[0]["data"]["peers"][0]["peerId"], a.to_string());
        let news = inbox(&mut ra);
        assert_eq!(news.len(), 1);
        assert_eq!(news[0]["type"], "new-peer");
        assert_eq!(news[0]["data"]["username"], "bob");
    }
    #[test]
    fn duplicate_username_is_rejected_silently() {
        let mut room = Room::new("r1");
        let (_, mut ra) = join(&mut room, "alice");
        inbox(&mut ra);
        let (conn, mut rx) = Connection::pair();
        assert_eq!(
            room.admit(PeerId::default(), "alice", conn),
            Err(UsernameTaken("alice".into()))
        );
        assert_eq!(room.len(), 1);
        assert!(inbox(&mut ra).is_empty());
        assert!(inbox(&mut rx).is_empty());
    }
    #[test]
    fn departure_is_announced() {
        let mut room = Room::new("r1");
        let (a, _ra) = join(&mut room, "alice");
        let (_, mut rb) = join(&mut room, "bob");
        inbox(&mut rb);
        let gone = room.depart(a).unwrap();
        assert_eq!(gone.username, "alice");
        let msgs = inbox(&mut rb);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0]["type"], "peer-disconnected");
        assert_eq!(msgs[0]["data"]["username"], "alice");
        assert!(room.depart(a).is_none());
    }
    #[test]
    fn broadcast_survives_dead_member() {
        let mut room = Room::new("r1");
        let (_, ra) = join(&mut room, "alice");
        let (_, mut rb) = join(&mut room, "bob");
        let (c, mut rc) = join(&mut room, "carol");
        drop(ra);
        inbox(&mut rb);
        inbox(&mut rc);
        room.broadcast(ServerMessage::game_error("x"), Some(c));
        assert_eq!(types(&mut rb), vec!["game-error"]);
        assert!(types(&mut rc).is_empty());
    }
    #[test]
    fn game_needs_two_players() {
        let mut room = Room::new("r1");
        let (_, mut ra) = join(&mut room, "alice");
        inbox(&mut ra);
        assert_eq!(room.start_game(50), Err(GameError::NotEnoughPlayers(1)));
        assert!(room.game().is_none());
        assert!(inbox(&mut ra).is_empty());
    }
    #[test]
    fn game_cannot_start_twice() {
        let mut room = Room::new("r1");
        let (_, _ra) = join(&mut room, "alice");
        let (_, _rb) = join(&mut room, "bob");
        assert!(room.start_game(50).is_ok());
        assert_eq!(room.start_game(20), Err(GameError::AlreadyActive));
        assert_eq!(room.game().map(|g| g.bomb()), Some(50));
    }
    #[test]
    fn guess_without_game() {
        let mut room = Room::new("r1");
        let (a, _ra) = join(&mut room, "alice");
        assert_eq!(room.submit_guess(a, &json!(5)), Err(GameError::NoGame));
    }
    #[test]
    fn full_round_then_explosion() {
        let mut room = Room::new("r2");
        let (a, mut ra) = join(&mut room, "alice");
        let (b, mut rb) = join(&mut room, "bob");
        inbox(&mut ra);
        inbox(&mut rb);
        room.start_game(60).unwrap();
        let start = inbox(&mut rb);
        assert_eq!(start[0]["type"], "game-state-update");
        assert_eq!(start[0]["data"]["totalPlayers"], 2);
        assert_eq!(start[0]["data"]["round"], 1);
        room.submit_guess(a, &json!(50)).unwrap();
        room.submit_guess(b, &json!(75)).unwrap();
        let msgs = inbox(&mut ra);
        let kinds = msgs.iter().map(|m| m["type"].clone()).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                json!("game-state-update"),
                json!("player-guessed"),
                json!("player-guessed"),
                json!("game-round-result"),
            ]
        );
        let result = &msgs[3]["data"];
        assert_eq!(result["currentRange"], json!({ "min": 51, "max": 74 }));
        assert_eq!(result["round"], 2);
        assert_eq!(result["guesses"], json!({ "alice": 50, "bob": 75 }));
        assert_eq!(result["waitingForGuesses"].as_array().map(Vec::len), Some(2));
        room.submit_guess(a, &json!(60)).unwrap();
        room.submit_guess(b, &json!(70)).unwrap();
        let end = inbox(&mut rb).pop().unwrap();
        assert_eq!(end["type"], "game-end");
        assert_eq!(end["data"]["result"], "explosion");
        assert_eq!(end["data"]["explodedPlayer"], a.to_string());
        assert_eq!(end["data"]["explodedUsername"], "alice");
        assert!(room.game().is_none());
    }
    #[test]
    fn leaver_not_awaited_completes_round() {
        let mut room = Room::new("r3");
        let (a, _ra) = join(&mut room, "alice");
        let (b, _rb) = join(&mut room, "bob");
        let (c, mut rc) = join(&mut room, "carol");
        room.start_game(60).unwrap();
        room.submit_guess(a, &json!(10)).unwrap();
        room.submit_guess(b, &json!(90)).unwrap();
        inbox(&mut rc);
        room.depart(c);
        assert_eq!(room.game().map(|g| g.round()), Some(2));
        assert_eq!(room.game().map(|g| g.waiting().len()), Some(2));
    }
    #[test]
    fn leaver_mid_round_is_announced() {
        let mut room = Room::new("r3");
        let (a, _ra) = join(&mut room, "alice");
        let (_, mut rb) = join(&mut room, "bob");
        let (c, _rc) = join(&mut room, "carol");
        room.start_game(60).unwrap();
        room.submit_guess(a, &json!(10)).unwrap();
        inbox(&mut rb);
        room.depart(c);
        let msgs = inbox(&mut rb);
        assert_eq!(msgs[0]["type"], "player-disconnected-during-game");
        assert_eq!(msgs[0]["data"]["disconnectedUsername"], "carol");
        assert_eq!(msgs[0]["data"]["waitingCount"], 1);
        assert_eq!(msgs[0]["data"]["totalPlayers"], 2);
        assert_eq!(msgs[1]["type"], "peer-disconnected");
        assert_eq!(room.game().map(|g| g.round()), Some(1));
    }
    #[test]
    fn attrition_ends_game_regardless_of_guesses() {
        let mut room = Room::new("r4");
        let (a, _ra) = join(&mut room, "alice");
        let (b, mut rb) = join(&mut room, "bob");
        room.start_game(60).unwrap();
        room.submit_guess(b, &json!(10)).unwrap();
        inbox(&mut rb);
        room.depart(a);
        let msgs = inbox(&mut rb);
        assert_eq!(msgs[0]["type"], "game-end");
        assert_eq!(msgs[0]["data"]["result"], "insufficient-players");
        assert_eq!(msgs[1]["type"], "peer-disconnected");
        assert!(room.game().is_none());
    }
}
