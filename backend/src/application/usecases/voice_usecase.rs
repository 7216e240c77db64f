//! Audio relay use case.

use crate::domain::UserId;
use crate::infrastructure::outbox::DeliveryError;
use crate::infrastructure::storage::RelayTables;
use crate::tcp::messages::ServerMessage;

/// Forwards audio chunks between the two parties of an active call.
#[derive(Clone)]
pub struct VoiceUseCase {
    logger: logging::Logger,
}

impl VoiceUseCase {
    pub fn new(logger: logging::Logger) -> Self {
        VoiceUseCase { logger }
    }

    /// Relays `payload` to the partner of `sender`. The payload has already
    /// been consumed from the stream; outside a call it is simply dropped.
    pub fn relay(&self, tables: &RelayTables, sender: &UserId, payload: Vec<u8>) {
        let Some(partner) = tables.ledger.partner(sender) else {
            self.logger.debug(&format!(
                "Dropped {} byte voice chunk from {} (not in a call)",
                payload.len(),
                sender
            ));
            return;
        };

        match tables.deliver(partner, ServerMessage::Voice(payload)) {
            Ok(()) => {}
            Err(DeliveryError::NotRegistered(_)) => self.logger.debug(&format!(
                "Dropped voice chunk from {}: partner {} is gone",
                sender, partner
            )),
            Err(e) => self.logger.warn(&format!(
                "Error forwarding voice {}->{}: {}",
                sender, partner, e
            )),
        }
    }
}
