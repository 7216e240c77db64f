//! Connection registry: user id -> live connection handle.

use std::collections::HashMap;

use crate::domain::{SessionContext, SessionId, UserId};
use crate::infrastructure::outbox::Outbox;

/// What the registry keeps for one registered session. The connection itself
/// stays owned by its session; the registry only holds the way to reach it.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub session_id: SessionId,
    pub outbox: Outbox,
}

/// Registered users. Not synchronized itself: it lives inside the shared
/// tables and is only touched within their lock.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    clients: HashMap<UserId, ClientHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites; returns the handle that was replaced.
    pub fn register(&mut self, user_id: UserId, handle: ClientHandle) -> Option<ClientHandle> {
        self.clients.insert(user_id, handle)
    }

    pub fn lookup(&self, user_id: &UserId) -> Option<&ClientHandle> {
        self.clients.get(user_id)
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.clients.contains_key(user_id)
    }

    pub fn remove(&mut self, user_id: &UserId) -> Option<ClientHandle> {
        self.clients.remove(user_id)
    }

    /// Whether `session` still owns the registration of its user id.
    pub fn is_current(&self, session: &SessionContext) -> bool {
        self.clients
            .get(&session.user_id)
            .is_some_and(|handle| handle.session_id == session.session_id)
    }

    /// Removes the registration only if it still belongs to `session`.
    pub fn remove_session(&mut self, session: &SessionContext) -> Option<ClientHandle> {
        if self.is_current(session) {
            self.clients.remove(&session.user_id)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
