//! Broadcast engine: best-effort fanout of pre-serialized frames.
//!
//! Delivery failures are isolated per recipient: a full or closed outbound
//! queue is logged and never aborts delivery to the rest, never propagates
//! to the caller.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::ConnectionId;

/// Deliver `frame` to every recipient except `exclude`.
///
/// Returns the number of successful deliveries. `try_send` keeps fanout
/// non-blocking: a slow consumer whose queue is full loses the frame
/// instead of stalling the others.
pub fn fanout<'a, I>(recipients: I, frame: &str, exclude: Option<&ConnectionId>) -> usize
where
    I: IntoIterator<Item = (&'a ConnectionId, &'a mpsc::Sender<String>)>,
{
    let mut delivered = 0;
    for (connection_id, sender) in recipients {
        if Some(connection_id) == exclude {
            continue;
        }
        if send_frame_to(connection_id, sender, frame) {
            delivered += 1;
        }
    }
    delivered
}

/// Deliver one frame to one connection. Returns `false` on failure.
pub fn send_frame_to(
    connection_id: &ConnectionId,
    sender: &mpsc::Sender<String>,
    frame: &str,
) -> bool {
    match sender.try_send(frame.to_string()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!(
                "Outbound queue full for connection '{}', dropping frame",
                connection_id
            );
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::warn!(
                "Outbound channel closed for connection '{}', dropping frame",
                connection_id
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionIdFactory;

    #[tokio::test]
    async fn test_fanout_delivers_to_all_recipients() {
        // given: three connected recipients
        let ids: Vec<_> = (0..3).map(|_| ConnectionIdFactory::generate()).collect();
        let channels: Vec<_> = (0..3).map(|_| mpsc::channel::<String>(8)).collect();
        let recipients: Vec<_> = ids.iter().zip(channels.iter().map(|(tx, _)| tx)).collect();

        // when:
        let delivered = fanout(recipients, "hello", None);

        // then: exactly one copy each
        assert_eq!(delivered, 3);
        for (_, mut rx) in channels {
            assert_eq!(rx.recv().await.unwrap(), "hello");
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn test_fanout_skips_excluded_connection() {
        // given:
        let alice = ConnectionIdFactory::generate();
        let bob = ConnectionIdFactory::generate();
        let (alice_tx, mut alice_rx) = mpsc::channel::<String>(8);
        let (bob_tx, mut bob_rx) = mpsc::channel::<String>(8);

        // when: alice is excluded
        let delivered = fanout(
            [(&alice, &alice_tx), (&bob, &bob_tx)],
            "hello",
            Some(&alice),
        );

        // then:
        assert_eq!(delivered, 1);
        assert!(alice_rx.try_recv().is_err());
        assert_eq!(bob_rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_fanout_isolates_closed_recipient() {
        // given: bob's receiver is already gone
        let alice = ConnectionIdFactory::generate();
        let bob = ConnectionIdFactory::generate();
        let charlie = ConnectionIdFactory::generate();
        let (alice_tx, mut alice_rx) = mpsc::channel::<String>(8);
        let (bob_tx, bob_rx) = mpsc::channel::<String>(8);
        drop(bob_rx);
        let (charlie_tx, mut charlie_rx) = mpsc::channel::<String>(8);

        // when:
        let delivered = fanout(
            [(&alice, &alice_tx), (&bob, &bob_tx), (&charlie, &charlie_tx)],
            "hello",
            None,
        );

        // then: the dead recipient does not abort the others
        assert_eq!(delivered, 2);
        assert_eq!(alice_rx.recv().await.unwrap(), "hello");
        assert_eq!(charlie_rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_fanout_drops_frame_when_queue_full() {
        // given: a queue of capacity 1 that is already full
        let alice = ConnectionIdFactory::generate();
        let (alice_tx, mut alice_rx) = mpsc::channel::<String>(1);
        alice_tx.try_send("backlog".to_string()).unwrap();

        // when:
        let delivered = fanout([(&alice, &alice_tx)], "hello", None);

        // then: the new frame was dropped, the backlog kept
        assert_eq!(delivered, 0);
        assert_eq!(alice_rx.recv().await.unwrap(), "backlog");
        assert!(alice_rx.try_recv().is_err());
    }
}
