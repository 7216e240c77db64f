//! Use cases - Call-routing operations run inside one storage transaction
pub mod call_usecase;
pub mod registration_usecase;
pub mod voice_usecase;

pub use call_usecase::CallUseCase;
pub use registration_usecase::{RegistrationOutcome, RegistrationUseCase};
pub use voice_usecase::VoiceUseCase;
