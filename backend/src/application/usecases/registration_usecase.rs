//! Registration and deregistration of sessions.

use crate::application::usecases::CallUseCase;
use crate::config::DuplicateRegistrationPolicy;
use crate::domain::{SessionContext, SessionId};
use crate::infrastructure::outbox::Outbox;
use crate::infrastructure::registry::ClientHandle;
use crate::infrastructure::storage::RelayTables;

/// Outcome of a `REGISTER` attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    /// The id was in use; the earlier session was torn down and closed
    Replaced { previous: SessionId },
    /// The id was in use and the policy keeps the earlier session
    Rejected,
}

/// Registration use case handler
#[derive(Clone)]
pub struct RegistrationUseCase {
    policy: DuplicateRegistrationPolicy,
    calls: CallUseCase,
    logger: logging::Logger,
}

impl RegistrationUseCase {
    pub fn new(
        policy: DuplicateRegistrationPolicy,
        calls: CallUseCase,
        logger: logging::Logger,
    ) -> Self {
        RegistrationUseCase {
            policy,
            calls,
            logger,
        }
    }

    /// Installs `session` in the registry according to the duplicate policy.
    pub fn register(
        &self,
        tables: &mut RelayTables,
        session: &SessionContext,
        outbox: Outbox,
    ) -> RegistrationOutcome {
        let user_id = &session.user_id;
        let handle = ClientHandle {
            session_id: session.session_id.clone(),
            outbox,
        };

        let Some(existing) = tables.registry.lookup(user_id) else {
            tables.registry.register(user_id.clone(), handle);
            self.logger
                .info(&format!("Client registered: {} ({})", user_id, session.session_id));
            return RegistrationOutcome::Registered;
        };

        match self.policy {
            DuplicateRegistrationPolicy::Reject => {
                self.logger.warn(&format!(
                    "Rejected registration of {}: already registered by {}",
                    user_id, existing.session_id
                ));
                RegistrationOutcome::Rejected
            }
            DuplicateRegistrationPolicy::Evict => {
                let previous = existing.session_id.clone();
                self.calls.release_user(tables, user_id);
                if let Some(old) = tables.registry.register(user_id.clone(), handle) {
                    old.outbox.close();
                }
                self.logger.warn(&format!(
                    "Client {} re-registered ({}); evicted session {}",
                    user_id, session.session_id, previous
                ));
                RegistrationOutcome::Replaced { previous }
            }
        }
    }

    /// Cleanup at session end: tears down the user's calls and removes the
    /// registration, unless a newer session owns the id by now.
    ///
    /// Returns `false` if the session was no longer registered.
    pub fn deregister(&self, tables: &mut RelayTables, session: &SessionContext) -> bool {
        if !tables.registry.is_current(session) {
            self.logger.info(&format!(
                "Session {} of {} was superseded; nothing to clean up",
                session.session_id, session.user_id
            ));
            return false;
        }

        self.calls.release_user(tables, &session.user_id);
        tables.registry.remove_session(session);
        self.logger
            .info(&format!("Client {} disconnected", session.user_id));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{drain, id, register, test_logger};
    use crate::infrastructure::outbox::Outbound;
    use crate::tcp::messages::ServerMessage;

    fn usecase(policy: DuplicateRegistrationPolicy) -> RegistrationUseCase {
        let logger = test_logger();
        RegistrationUseCase::new(policy, CallUseCase::new(logger.clone()), logger)
    }

    #[test]
    fn test_register_fresh_user() {
        let mut tables = RelayTables::default();
        let session = SessionContext::new(id("alice"));
        let (outbox, _receiver) = Outbox::channel();

        let outcome =
            usecase(DuplicateRegistrationPolicy::Reject).register(&mut tables, &session, outbox);

        assert_eq!(outcome, RegistrationOutcome::Registered);
        assert!(tables.registry.is_current(&session));
    }

    #[test]
    fn test_duplicate_rejected_keeps_existing_session() {
        let mut tables = RelayTables::default();
        let registrations = usecase(DuplicateRegistrationPolicy::Reject);
        let first = SessionContext::new(id("alice"));
        let second = SessionContext::new(id("alice"));
        let (first_outbox, first_queue) = Outbox::channel();
        let (second_outbox, _second_queue) = Outbox::channel();

        registrations.register(&mut tables, &first, first_outbox);
        let outcome = registrations.register(&mut tables, &second, second_outbox);

        assert_eq!(outcome, RegistrationOutcome::Rejected);
        assert!(tables.registry.is_current(&first));
        assert!(first_queue.try_recv().is_err());
    }

    #[test]
    fn test_duplicate_evicts_previous_session_and_its_call() {
        let mut tables = RelayTables::default();
        let registrations = usecase(DuplicateRegistrationPolicy::Evict);
        let first = SessionContext::new(id("alice"));
        let second = SessionContext::new(id("alice"));
        let (first_outbox, first_queue) = Outbox::channel();
        let (second_outbox, _second_queue) = Outbox::channel();
        let bob = register(&mut tables, "bob");

        registrations.register(&mut tables, &first, first_outbox);
        tables.ledger.connect(id("alice"), id("bob"));

        let outcome = registrations.register(&mut tables, &second, second_outbox);

        assert_eq!(
            outcome,
            RegistrationOutcome::Replaced {
                previous: first.session_id.clone()
            }
        );
        assert!(tables.registry.is_current(&second));
        assert_eq!(drain(&bob), vec![ServerMessage::Hangup]);
        assert!(tables.ledger.is_empty());
        assert_eq!(first_queue.try_recv(), Ok(Outbound::Close));
    }

    #[test]
    fn test_deregister_removes_user_and_hangs_up_partner() {
        let mut tables = RelayTables::default();
        let registrations = usecase(DuplicateRegistrationPolicy::Reject);
        let session = SessionContext::new(id("alice"));
        let (outbox, _queue) = Outbox::channel();
        let bob = register(&mut tables, "bob");

        registrations.register(&mut tables, &session, outbox);
        tables.ledger.connect(id("alice"), id("bob"));

        assert!(registrations.deregister(&mut tables, &session));
        assert!(!tables.registry.contains(&id("alice")));
        assert_eq!(drain(&bob), vec![ServerMessage::Hangup]);
        assert!(tables.ledger.is_empty());
    }

    #[test]
    fn test_deregister_superseded_session_leaves_successor_alone() {
        let mut tables = RelayTables::default();
        let registrations = usecase(DuplicateRegistrationPolicy::Evict);
        let first = SessionContext::new(id("alice"));
        let second = SessionContext::new(id("alice"));
        let (first_outbox, _first_queue) = Outbox::channel();
        let (second_outbox, _second_queue) = Outbox::channel();
        let bob = register(&mut tables, "bob");

        registrations.register(&mut tables, &first, first_outbox);
        registrations.register(&mut tables, &second, second_outbox);
        tables.ledger.connect(id("alice"), id("bob"));

        assert!(!registrations.deregister(&mut tables, &first));
        assert!(tables.registry.is_current(&second));
        assert_eq!(tables.ledger.active_count(), 1);
        assert!(drain(&bob).is_empty());
    }
}
