//! Inbound command lines.

use crate::domain::UserId;

const REGISTER_PREFIX: &str = "REGISTER ";

/// A fully read client command, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Call { dest: UserId },
    Answer { caller: UserId },
    Decline { caller: UserId },
    /// Carries the fixed-size audio chunk that followed the `VOICE` line
    Voice { payload: Vec<u8> },
    Hangup,
}

/// Result of interpreting one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Command(Command),
    /// `VOICE` line; the binary chunk still has to be read from the stream
    VoiceHeader,
    /// Only whitespace
    Blank,
    /// Known keyword without its required argument
    MissingArgument(&'static str),
    Unknown(String),
}

/// Parses a command line. Keywords are case-insensitive, tokens are
/// whitespace-separated and trailing tokens are ignored.
pub fn parse_command(line: &str) -> ParsedLine {
    let mut tokens = line.split_whitespace();

    let Some(keyword) = tokens.next() else {
        return ParsedLine::Blank;
    };
    let argument = tokens.next().map(str::to_string);

    match keyword.to_uppercase().as_str() {
        "CALL" => match argument {
            Some(dest) => ParsedLine::Command(Command::Call { dest }),
            None => ParsedLine::MissingArgument("CALL"),
        },
        "ANSWER" => match argument {
            Some(caller) => ParsedLine::Command(Command::Answer { caller }),
            None => ParsedLine::MissingArgument("ANSWER"),
        },
        "DECLINE" => match argument {
            Some(caller) => ParsedLine::Command(Command::Decline { caller }),
            None => ParsedLine::MissingArgument("DECLINE"),
        },
        "VOICE" => ParsedLine::VoiceHeader,
        "HANGUP" => ParsedLine::Command(Command::Hangup),
        _ => ParsedLine::Unknown(line.to_string()),
    }
}

/// Extracts the user id from a `REGISTER <id>` line.
///
/// The keyword is case-sensitive and must be followed by a single space;
/// anything after the id is ignored.
pub fn parse_registration(line: &str) -> Option<UserId> {
    line.strip_prefix(REGISTER_PREFIX)?
        .split_whitespace()
        .next()
        .map(str::to_string)
}
