//! Message handler - Orchestrates usecases based on incoming commands

use crate::application::usecases::{
    CallUseCase, RegistrationOutcome, RegistrationUseCase, VoiceUseCase,
};
use crate::config::DuplicateRegistrationPolicy;
use crate::domain::SessionContext;
use crate::infrastructure::outbox::Outbox;
use crate::infrastructure::storage::Storage;
use crate::tcp::messages::Command;

/// What the session loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    /// A newer session took over this user id; stop reading
    Superseded,
}

/// Command dispatcher. Each call is one storage transaction: the state check,
/// the table updates and the enqueueing of every resulting message happen
/// under the same lock.
#[derive(Clone)]
pub struct MessageHandler {
    storage: Storage,
    registration_usecase: RegistrationUseCase,
    call_usecase: CallUseCase,
    voice_usecase: VoiceUseCase,
    logger: logging::Logger,
}

impl MessageHandler {
    pub fn new(
        storage: Storage,
        policy: DuplicateRegistrationPolicy,
        logger: logging::Logger,
    ) -> Self {
        let call_usecase = CallUseCase::new(logger.for_component("Call Usecase"));
        let registration_usecase = RegistrationUseCase::new(
            policy,
            call_usecase.clone(),
            logger.for_component("Registration Usecase"),
        );
        let voice_usecase = VoiceUseCase::new(logger.for_component("Voice Usecase"));

        MessageHandler {
            storage,
            registration_usecase,
            call_usecase,
            voice_usecase,
            logger,
        }
    }

    pub fn register_session(&self, session: &SessionContext, outbox: Outbox) -> RegistrationOutcome {
        self.storage.transaction(|tables| {
            self.registration_usecase
                .register(tables, session, outbox)
        })
    }

    /// Process one command issued by `session`
    pub fn process_command(&self, session: &SessionContext, command: Command) -> Dispatch {
        self.storage.transaction(|tables| {
            if !tables.registry.is_current(session) {
                self.logger.warn(&format!(
                    "Ignoring command from superseded session {} of {}",
                    session.session_id, session.user_id
                ));
                return Dispatch::Superseded;
            }

            let user_id = &session.user_id;
            let reply = match command {
                Command::Call { dest } => self.call_usecase.handle_call(tables, user_id, &dest),
                Command::Answer { caller } => {
                    self.call_usecase.handle_answer(tables, user_id, &caller);
                    None
                }
                Command::Decline { caller } => {
                    self.call_usecase.handle_decline(tables, user_id, &caller);
                    None
                }
                Command::Voice { payload } => {
                    self.voice_usecase.relay(tables, user_id, payload);
                    None
                }
                Command::Hangup => {
                    self.call_usecase.handle_hangup(tables, user_id);
                    None
                }
            };

            if let Some(reply) = reply
                && let Err(e) = tables.deliver(user_id, reply)
            {
                self.logger
                    .error(&format!("Failed to reply to {}: {}", user_id, e));
            }

            Dispatch::Continue
        })
    }

    /// Cleanup when a session ends
    pub fn cleanup_session(&self, session: &SessionContext) -> bool {
        self.storage
            .transaction(|tables| self.registration_usecase.deregister(tables, session))
    }
}
