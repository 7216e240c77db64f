//! Session identity

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::UserId;

/// Identifies one accepted connection. Two successive registrations of the
/// same user id always carry different session ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a session id from the current timestamp and a random number
    pub fn generate() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();

        let random: u32 = rand::random();

        SessionId(format!("session_{}_{:08x}", timestamp, random))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The registered identity of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: UserId,
    pub session_id: SessionId,
}

impl SessionContext {
    pub fn new(user_id: UserId) -> Self {
        SessionContext {
            user_id,
            session_id: SessionId::generate(),
        }
    }
}
