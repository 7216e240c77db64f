//! Voice relay server library
//!
//! Call signaling and voice relay over a line-oriented TCP protocol. Exposes
//! the domain model, the shared tables and the TCP server for integration
//! testing.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod tcp;

// Re-export commonly used types for integration tests
pub use application::handlers::{Dispatch, MessageHandler};
pub use config::{DuplicateRegistrationPolicy, RelayConfig, ServerConfig};
pub use domain::{CallFailure, SessionContext, UserState};
pub use infrastructure::storage::Storage;
pub use tcp::TcpServer;
