//! User state domain model

/// Call-routing state of a registered user.
///
/// `Calling` is never stored; it is derived from the outgoing-call index of
/// the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserState {
    /// Registered, no call in progress
    Idle,
    /// Someone is calling this user and the call is not answered yet
    Ringing,
    /// This user placed a call that is not answered yet
    Calling,
    /// In an answered call
    Active,
}

impl UserState {
    /// Whether a new incoming call must be refused with `User busy`.
    pub fn refuses_incoming(&self) -> bool {
        matches!(self, UserState::Ringing | UserState::Active)
    }
}

impl std::fmt::Display for UserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserState::Idle => write!(f, "Idle"),
            UserState::Ringing => write!(f, "Ringing"),
            UserState::Calling => write!(f, "Calling"),
            UserState::Active => write!(f, "Active"),
        }
    }
}
