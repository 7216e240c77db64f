//! Outbound server messages.

use crate::domain::{CallFailure, UserId};

/// A message queued for delivery to one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    IncomingCall { caller: UserId },
    CallFailed(CallFailure),
    CallAccepted { callee: UserId },
    CallDeclined { callee: UserId },
    /// `VOICE` line immediately followed by the raw chunk
    Voice(Vec<u8>),
    Hangup,
}

impl ServerMessage {
    /// Text line of the message, without the trailing newline.
    pub fn line(&self) -> String {
        match self {
            ServerMessage::IncomingCall { caller } => format!("INCOMING_CALL {}", caller),
            ServerMessage::CallFailed(failure) => format!("CALL_FAILED {}", failure.reason()),
            ServerMessage::CallAccepted { callee } => format!("CALL_ACCEPTED {}", callee),
            ServerMessage::CallDeclined { callee } => format!("CALL_DECLINED {}", callee),
            ServerMessage::Voice(_) => "VOICE".to_string(),
            ServerMessage::Hangup => "HANGUP".to_string(),
        }
    }

    /// Complete wire encoding. A voice message is one contiguous buffer so
    /// the line and its payload are never split by another write.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = self.line().into_bytes();
        bytes.push(b'\n');
        if let ServerMessage::Voice(payload) = self {
            bytes.extend_from_slice(payload);
        }
        bytes
    }
}
