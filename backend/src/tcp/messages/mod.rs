mod command;
mod server_message;

pub use command::{Command, ParsedLine, parse_command, parse_registration};
pub use server_message::ServerMessage;
