//! Call routing outcomes

/// Reason a `CALL` request was refused. The wire text is fixed by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallFailure {
    /// The destination has no live registration
    UserNotOnline,
    /// The destination is ringing or already in a call
    UserBusy,
    /// The requester already has an outgoing or answered call
    AlreadyInCall,
}

impl CallFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            CallFailure::UserNotOnline => "User not online",
            CallFailure::UserBusy => "User busy",
            CallFailure::AlreadyInCall => "You are already in a call",
        }
    }
}

impl std::fmt::Display for CallFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}
