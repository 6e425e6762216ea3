use super::*;
use crate::peers::Frame;
use crate::peers::PeerId;
use futures::StreamExt;
use std::sync::Arc;

/// Pumps frames between one WebSocket and the hub until either side ends.
///
/// Outbound frames queued by the hub are written to the socket; inbound text
/// frames are dispatched in arrival order. Whatever ends the loop, the peer
/// is torn down exactly once.
pub async fn bridge(
    hub: Arc<Hub>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let (peer, mut outbox) = hub.connect().await;
    let farewell = Farewell::new(hub.clone(), peer);
    'sesh: loop {
        tokio::select! {
            biased;
            frame = outbox.recv() => match frame {
                Some(Frame::Text(json)) => if session.text(json).await.is_err() { break 'sesh },
                Some(Frame::Close(reason)) => {
                    let reason = actix_ws::CloseReason {
                        code: actix_ws::CloseCode::Policy,
                        description: Some(reason),
                    };
                    let _ = session.clone().close(Some(reason)).await;
                    break 'sesh
                }
                None => break 'sesh,
            },
            msg = stream.next() => match msg {
                Some(Ok(actix_ws::Message::Text(text))) => hub.dispatch(peer, &text).await,
                Some(Ok(actix_ws::Message::Ping(bytes))) => if session.pong(&bytes).await.is_err() { break 'sesh },
                Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                Some(Err(e)) => {
                    log::debug!("socket error for {}: {}", peer, e);
                    break 'sesh
                }
                None => break 'sesh,
                _ => continue 'sesh,
            },
        }
    }
    let _ = session.close(None).await;
    farewell.release().await;
}

/// Guarantees teardown of a peer on every exit path of its bridge,
/// including a task dropped mid-await.
struct Farewell {
    pending: Option<(Arc<Hub>, PeerId)>,
}

impl Farewell {
    fn new(hub: Arc<Hub>, peer: PeerId) -> Self {
        Self {
            pending: Some((hub, peer)),
        }
    }
    async fn release(mut self) {
        if let Some((hub, peer)) = self.pending.take() {
            hub.disconnect(peer).await;
        }
    }
}

impl Drop for Farewell {
    fn drop(&mut self) {
        if let Some((hub, peer)) = self.pending.take() {
            tokio::spawn(async move { hub.disconnect(peer).await });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[tokio::test]
    async fn dropped_farewell_still_disconnects() {
        let hub = Arc::new(Hub::default());
        let (peer, _outbox) = hub.connect().await;
        drop(Farewell::new(hub.clone(), peer));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(hub.peers().len().await, 0);
    }
    #[tokio::test]
    async fn released_farewell_disconnects_once() {
        let hub = Arc::new(Hub::default());
        let (peer, _outbox) = hub.connect().await;
        Farewell::new(hub.clone(), peer).release().await;
        assert_eq!(hub.peers().len().await, 0);
        hub.disconnect(peer).await;
        assert_eq!(hub.peers().len().await, 0);
    }
}
