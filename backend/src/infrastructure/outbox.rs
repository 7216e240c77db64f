//! Per-session outgoing queue.

use std::fmt;
use std::iter;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{
    Receiver, RecvError, SyncSender, TryRecvError, TrySendError, sync_channel,
};

use crate::domain::UserId;
use crate::tcp::messages::ServerMessage;

/// Messages a session may have waiting before it counts as too slow.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// Item drained by a session's writer thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Message(ServerMessage),
    /// Shut the connection down (the session was evicted or fell behind)
    Close,
}

/// Failure to hand a message to a recipient's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    NotRegistered(UserId),
    QueueClosed(UserId),
    /// The recipient stopped reading; its connection is being closed
    QueueFull(UserId),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::NotRegistered(user_id) => write!(f, "User {} not connected", user_id),
            DeliveryError::QueueClosed(user_id) => {
                write!(f, "Connection of {} is no longer writable", user_id)
            }
            DeliveryError::QueueFull(user_id) => {
                write!(f, "Outgoing queue of {} is full; closing its connection", user_id)
            }
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Sending half of a session's outgoing queue.
///
/// Enqueueing never blocks, so it is safe while the shared tables are locked.
/// The queue is bounded: a recipient that lets it fill up is closed.
#[derive(Debug, Clone)]
pub struct Outbox {
    sender: SyncSender<Outbound>,
    closing: Arc<AtomicBool>,
}

/// Receiving half, owned by the session's writer thread.
#[derive(Debug)]
pub struct OutboxReceiver {
    receiver: Receiver<Outbound>,
    closing: Arc<AtomicBool>,
}

impl Outbox {
    pub fn channel() -> (Outbox, OutboxReceiver) {
        Self::bounded(DEFAULT_OUTBOX_CAPACITY)
    }

    /// Queue holding at most `capacity` items (at least one).
    pub fn bounded(capacity: usize) -> (Outbox, OutboxReceiver) {
        let (sender, receiver) = sync_channel(capacity.max(1));
        let closing = Arc::new(AtomicBool::new(false));
        (
            Outbox {
                sender,
                closing: Arc::clone(&closing),
            },
            OutboxReceiver { receiver, closing },
        )
    }

    /// Fails when the writer thread has stopped, or when the queue is full.
    /// A full queue also requests the connection to be closed.
    pub fn send(&self, message: ServerMessage) -> Result<(), TrySendError<Outbound>> {
        let result = self.sender.try_send(Outbound::Message(message));
        if let Err(TrySendError::Full(_)) = result {
            self.closing.store(true, Ordering::Release);
        }
        result
    }

    /// Asks the writer thread to shut the connection down once everything
    /// queued before has been written. If the queue is full, the writer
    /// stops at the next item instead.
    pub fn close(&self) {
        if let Err(TrySendError::Full(_)) = self.sender.try_send(Outbound::Close) {
            self.closing.store(true, Ordering::Release);
        }
    }
}

impl OutboxReceiver {
    /// Blocks for the next item. Errors once every [`Outbox`] is gone and
    /// the queue is empty.
    pub fn recv(&self) -> Result<Outbound, RecvError> {
        self.receiver.recv().map(|item| self.checked(item))
    }

    pub fn try_recv(&self) -> Result<Outbound, TryRecvError> {
        self.receiver.try_recv().map(|item| self.checked(item))
    }

    /// Items already queued, without blocking.
    pub fn try_iter(&self) -> impl Iterator<Item = Outbound> + '_ {
        iter::from_fn(move || self.try_recv().ok())
    }

    fn checked(&self, item: Outbound) -> Outbound {
        if self.closing.load(Ordering::Acquire) {
            Outbound::Close
        } else {
            item
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_received_in_order() {
        let (outbox, receiver) = Outbox::channel();

        outbox.send(ServerMessage::Hangup).unwrap();
        outbox.close();

        assert_eq!(
            receiver.try_iter().collect::<Vec<_>>(),
            vec![Outbound::Message(ServerMessage::Hangup), Outbound::Close]
        );
    }

    #[test]
    fn test_send_fails_after_writer_is_gone() {
        let (outbox, receiver) = Outbox::channel();
        drop(receiver);

        assert!(matches!(
            outbox.send(ServerMessage::Hangup),
            Err(TrySendError::Disconnected(_))
        ));
    }

    #[test]
    fn test_full_queue_rejects_and_requests_close() {
        let (outbox, receiver) = Outbox::bounded(2);

        outbox.send(ServerMessage::Voice(vec![1; 4])).unwrap();
        outbox.send(ServerMessage::Voice(vec![2; 4])).unwrap();
        let overflow = outbox.send(ServerMessage::Voice(vec![3; 4]));

        assert!(matches!(overflow, Err(TrySendError::Full(_))));
        // The writer stops at the next item instead of draining the backlog
        assert_eq!(receiver.try_recv(), Ok(Outbound::Close));
    }

    #[test]
    fn test_close_on_full_queue_still_stops_writer() {
        let (outbox, receiver) = Outbox::bounded(1);

        outbox.send(ServerMessage::Hangup).unwrap();
        outbox.close();

        assert_eq!(receiver.recv(), Ok(Outbound::Close));
    }
}
