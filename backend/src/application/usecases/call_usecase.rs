//! Call lifecycle use cases (request, answer, decline, hangup).

use crate::domain::{CallFailure, UserId};
use crate::infrastructure::outbox::DeliveryError;
use crate::infrastructure::storage::RelayTables;
use crate::tcp::messages::ServerMessage;

/// Call management use case handler.
///
/// Every method runs inside the caller's transaction; the returned message,
/// if any, is the reply for the user who issued the command.
#[derive(Clone)]
pub struct CallUseCase {
    logger: logging::Logger,
}

impl CallUseCase {
    pub fn new(logger: logging::Logger) -> Self {
        CallUseCase { logger }
    }

    /// Handle `CALL dest` from `caller`
    pub fn handle_call(
        &self,
        tables: &mut RelayTables,
        caller: &UserId,
        dest: &UserId,
    ) -> Option<ServerMessage> {
        if !tables.registry.contains(dest) {
            self.logger.info(&format!(
                "{} attempted call to offline user {}",
                caller, dest
            ));
            return Some(ServerMessage::CallFailed(CallFailure::UserNotOnline));
        }

        // Calling yourself is refused like calling a busy user; a session
        // cannot be both ends of one call
        if dest == caller || tables.ledger.state_of(dest).refuses_incoming() {
            self.logger
                .info(&format!("{} attempted call to busy user {}", caller, dest));
            return Some(ServerMessage::CallFailed(CallFailure::UserBusy));
        }

        if tables.ledger.partner(caller).is_some() || tables.ledger.outgoing_call(caller).is_some()
        {
            self.logger
                .info(&format!("{} attempted call while already busy", caller));
            return Some(ServerMessage::CallFailed(CallFailure::AlreadyInCall));
        }

        tables.ledger.ring(caller.clone(), dest.clone());

        match tables.deliver(
            dest,
            ServerMessage::IncomingCall {
                caller: caller.clone(),
            },
        ) {
            Ok(()) => self
                .logger
                .info(&format!("Call from {} to {} forwarded.", caller, dest)),
            Err(e) => self
                .logger
                .error(&format!("Error notifying {}: {}", dest, e)),
        }

        None
    }

    /// Handle `ANSWER caller` from `callee`
    pub fn handle_answer(&self, tables: &mut RelayTables, callee: &UserId, caller: &UserId) {
        if tables.ledger.pending_caller(callee) != Some(caller) {
            self.logger.info(&format!(
                "{} answered but no pending call from {}",
                callee, caller
            ));
            return;
        }

        tables.ledger.take_pending(callee);

        // The callee may have been ringing someone else meanwhile. That call
        // is dropped without a message, as when a caller disconnects while
        // ringing: the protocol has no server-to-callee cancel, and a later
        // ANSWER or DECLINE for it is simply ignored.
        if let Some(abandoned) = tables.ledger.withdraw_outgoing(callee) {
            self.logger.info(&format!(
                "{} answered {}; withdrew outgoing call to {}",
                callee, caller, abandoned
            ));
        }

        tables.ledger.connect(callee.clone(), caller.clone());

        match tables.deliver(
            caller,
            ServerMessage::CallAccepted {
                callee: callee.clone(),
            },
        ) {
            Ok(()) => self.logger.info(&format!(
                "{} answered call from {}. Call active.",
                callee, caller
            )),
            Err(e) => self.logger.error(&format!(
                "Error notifying {} of acceptance: {}",
                caller, e
            )),
        }

        // Likewise the caller may be ringing; that call can no longer connect
        if let Some(waiting) = tables.ledger.take_pending(caller) {
            self.logger.info(&format!(
                "{} is now in a call; refused pending call from {}",
                caller, waiting
            ));
            let refusal = ServerMessage::CallFailed(CallFailure::UserBusy);
            if let Err(e) = tables.deliver(&waiting, refusal) {
                self.logger
                    .debug(&format!("Could not notify {}: {}", waiting, e));
            }
        }
    }

    /// Handle `DECLINE caller` from `callee`
    pub fn handle_decline(&self, tables: &mut RelayTables, callee: &UserId, caller: &UserId) {
        if tables.ledger.pending_caller(callee) != Some(caller) {
            self.logger.info(&format!(
                "{} declined but no pending call from {}",
                callee, caller
            ));
            return;
        }

        tables.ledger.take_pending(callee);

        match tables.deliver(
            caller,
            ServerMessage::CallDeclined {
                callee: callee.clone(),
            },
        ) {
            Ok(()) => self
                .logger
                .info(&format!("{} declined call from {}.", callee, caller)),
            Err(e) => self.logger.error(&format!(
                "Error notifying {} of decline: {}",
                caller, e
            )),
        }
    }

    /// Handle `HANGUP` from either party. No-op outside an active call.
    pub fn handle_hangup(&self, tables: &mut RelayTables, user_id: &UserId) {
        let Some(partner) = tables.ledger.disconnect(user_id) else {
            self.logger
                .debug(&format!("{} sent HANGUP outside of a call", user_id));
            return;
        };

        self.notify_hangup(tables, &partner);
        self.logger
            .info(&format!("{} hung up the call with {}", user_id, partner));
    }

    /// Tears down every call involving `user_id`, as if it hung up and
    /// withdrew its calls. Used when a session ends or is evicted.
    pub fn release_user(&self, tables: &mut RelayTables, user_id: &UserId) {
        if let Some(caller) = tables.ledger.take_pending(user_id) {
            self.logger.info(&format!(
                "Dropped pending call from {} to {}",
                caller, user_id
            ));
        }

        if let Some(callee) = tables.ledger.withdraw_outgoing(user_id) {
            self.logger.info(&format!(
                "Dropped pending call from {} to {}",
                user_id, callee
            ));
        }

        if let Some(partner) = tables.ledger.disconnect(user_id) {
            self.notify_hangup(tables, &partner);
            self.logger.info(&format!(
                "Call between {} and {} ended by disconnect",
                user_id, partner
            ));
        }
    }

    fn notify_hangup(&self, tables: &RelayTables, partner: &UserId) {
        match tables.deliver(partner, ServerMessage::Hangup) {
            Ok(()) => {}
            Err(DeliveryError::NotRegistered(_)) => {
                self.logger
                    .debug(&format!("Partner {} already gone; no HANGUP sent", partner));
            }
            Err(e) => self
                .logger
                .error(&format!("Error sending HANGUP to {}: {}", partner, e)),
        }
    }
}
