//! Helpers shared by the application-layer unit tests.

use crate::domain::{SessionContext, UserId};
use crate::infrastructure::outbox::{Outbound, Outbox, OutboxReceiver};
use crate::infrastructure::registry::ClientHandle;
use crate::infrastructure::storage::RelayTables;
use crate::tcp::messages::ServerMessage;

pub(crate) fn test_logger() -> logging::Logger {
    logging::Logger::builder(logging::LogLevel::Debug)
        .build()
        .expect("logger without file sink")
}

pub(crate) fn id(name: &str) -> UserId {
    name.to_string()
}

/// Registers `session` directly in the tables and returns its queue.
pub(crate) fn register_session(
    tables: &mut RelayTables,
    session: &SessionContext,
) -> OutboxReceiver {
    let (outbox, receiver) = Outbox::channel();
    tables.registry.register(
        session.user_id.clone(),
        ClientHandle {
            session_id: session.session_id.clone(),
            outbox,
        },
    );
    receiver
}

pub(crate) fn register(tables: &mut RelayTables, user: &str) -> OutboxReceiver {
    register_session(tables, &SessionContext::new(id(user)))
}

/// Messages queued so far, in order. `Close` requests are skipped.
pub(crate) fn drain(receiver: &OutboxReceiver) -> Vec<ServerMessage> {
    receiver
        .try_iter()
        .filter_map(|outbound| match outbound {
            Outbound::Message(message) => Some(message),
            Outbound::Close => None,
        })
        .collect()
}
