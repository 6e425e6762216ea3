use crate::protocol::ServerMessage;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// Outbound frames queued for one socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    /// Close the socket with a policy-violation code and this reason.
    Close(String),
}

/// Send-capable handle to one client socket.
///
/// The socket itself is owned by the bridge task draining the paired
/// receiver; this handle only queues frames for it. Sending never blocks,
/// and a send to a socket that is already gone reports `false` and is
/// otherwise ignored.
#[derive(Debug, Clone)]
pub struct Connection {
    tx: UnboundedSender<Frame>,
}

impl Connection {
    /// Creates a handle together with the receiver the socket task drains.
    pub fn pair() -> (Self, UnboundedReceiver<Frame>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
    pub fn send(&self, msg: &ServerMessage) -> bool {
        self.tx.send(Frame::Text(msg.to_json())).is_ok()
    }
    pub fn close(&self, reason: &str) -> bool {
        self.tx.send(Frame::Close(reason.to_string())).is_ok()
    }
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peers::PeerId;
    #[test]
    fn frames_arrive_in_order() {
        let (conn, mut rx) = Connection::pair();
        let id = PeerId::default();
        assert!(conn.send(&ServerMessage::your_id(id)));
        assert!(conn.close("bye"));
        assert!(matches!(rx.try_recv(), Ok(Frame::Text(t)) if t.contains("your-id")));
        assert_eq!(rx.try_recv(), Ok(Frame::Close("bye".into())));
    }
    #[test]
    fn send_after_hangup_is_harmless() {
        let (conn, rx) = Connection::pair();
        drop(rx);
        assert!(conn.is_closed());
        assert!(!conn.send(&ServerMessage::game_error("late")));
    }
}
