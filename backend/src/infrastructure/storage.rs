//! Shared call-routing state behind a single lock

use crate::domain::{UserId, UserState};
use crate::infrastructure::ledger::CallLedger;
use crate::infrastructure::outbox::DeliveryError;
use crate::infrastructure::registry::ConnectionRegistry;
use crate::tcp::messages::ServerMessage;
use std::sync::mpsc::TrySendError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Everything the dispatcher reads and writes. Only reachable through
/// [`Storage::transaction`].
#[derive(Debug, Default)]
pub struct RelayTables {
    pub registry: ConnectionRegistry,
    pub ledger: CallLedger,
}

impl RelayTables {
    /// Enqueues `message` on the recipient's outgoing queue.
    ///
    /// A full queue closes the recipient's connection; its own session
    /// cleanup then tears down its calls.
    pub fn deliver(&self, recipient: &UserId, message: ServerMessage) -> Result<(), DeliveryError> {
        let handle = self
            .registry
            .lookup(recipient)
            .ok_or_else(|| DeliveryError::NotRegistered(recipient.clone()))?;

        handle.outbox.send(message).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::QueueFull(recipient.clone()),
            TrySendError::Disconnected(_) => DeliveryError::QueueClosed(recipient.clone()),
        })
    }

    /// `None` when the user is not registered.
    pub fn user_state(&self, user_id: &UserId) -> Option<UserState> {
        if !self.registry.contains(user_id) {
            return None;
        }
        Some(self.ledger.state_of(user_id))
    }
}

/// Thread-safe handle to the relay tables.
///
/// Clones share the same tables. Every mutation happens inside one
/// `transaction`, so mutating commands are applied in a total order and never
/// interleave.
#[derive(Clone, Default)]
pub struct Storage {
    tables: Arc<Mutex<RelayTables>>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `operation` with exclusive access to the tables.
    ///
    /// A panic inside an earlier transaction does not lock everyone out.
    pub fn transaction<T, F>(&self, operation: F) -> T
    where
        F: FnOnce(&mut RelayTables) -> T,
    {
        let mut tables = self.lock();
        operation(&mut tables)
    }

    fn lock(&self) -> MutexGuard<'_, RelayTables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Read-only snapshots =====

    pub fn is_registered(&self, user_id: &str) -> bool {
        self.lock().registry.contains(&user_id.to_string())
    }

    pub fn registered_count(&self) -> usize {
        self.lock().registry.len()
    }

    pub fn user_state(&self, user_id: &str) -> Option<UserState> {
        self.lock().user_state(&user_id.to_string())
    }

    pub fn active_partner(&self, user_id: &str) -> Option<UserId> {
        self.lock().ledger.partner(&user_id.to_string()).cloned()
    }

    pub fn pending_caller(&self, callee: &str) -> Option<UserId> {
        self.lock().ledger.pending_caller(&callee.to_string()).cloned()
    }

    pub fn check_invariants(&self) -> Result<(), String> {
        self.lock().ledger.check_invariants()
    }
}
