//! Domain layer - Pure call-routing models

/// Type alias for User identifiers as announced by `REGISTER`
pub type UserId = String;

mod call;
mod session;
mod user_state;

pub use call::CallFailure;
pub use session::{SessionContext, SessionId};
pub use user_state::UserState;
