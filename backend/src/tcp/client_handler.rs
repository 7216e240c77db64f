//! Session supervisor: registration, read/dispatch loop and cleanup for one
//! client connection.

use std::any::Any;
use std::io;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::handlers::{Dispatch, MessageHandler};
use crate::application::usecases::RegistrationOutcome;
use crate::config::ServerConfig;
use crate::domain::SessionContext;
use crate::infrastructure::outbox::Outbox;
use crate::tcp::messages::{Command, ParsedLine, parse_command, parse_registration};
use crate::tcp::peer_writer::spawn_peer_writer;
use crate::tcp::protocol::{self, LineReader};

/// Why the read/dispatch loop stopped.
enum SessionEnd {
    Disconnected,
    TruncatedPayload,
    Superseded,
}

/// Client connection handler
pub struct ClientHandler {
    stream: TcpStream,
    reader: LineReader<TcpStream>,
    message_handler: MessageHandler,
    logger: logging::Logger,
    peer_addr: SocketAddr,
    chunk_size: usize,
    outbox_capacity: usize,
    write_timeout: Duration,
}

impl ClientHandler {
    pub fn new(
        stream: TcpStream,
        message_handler: MessageHandler,
        config: &ServerConfig,
        logger: logging::Logger,
    ) -> io::Result<Self> {
        let peer_addr = stream.peer_addr()?;
        let reader = LineReader::with_max_line_length(stream.try_clone()?, config.max_line_length);

        Ok(ClientHandler {
            stream,
            reader,
            message_handler,
            logger,
            peer_addr,
            chunk_size: config.chunk_size,
            outbox_capacity: config.outbox_capacity,
            write_timeout: config.write_timeout(),
        })
    }

    /// Serves the connection until it ends. Cleanup runs exactly once for a
    /// registered session, whatever ended it.
    pub fn handle(&mut self) -> io::Result<()> {
        self.logger
            .info(&format!("New connection from {}", self.peer_addr));

        let session = match self.read_registration() {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.close();
                return Ok(());
            }
            Err(e) => {
                self.close();
                return Err(io::Error::other(format!("{}", e)));
            }
        };

        let (outbox, outbound) = Outbox::bounded(self.outbox_capacity);
        let writer = match self.stream.try_clone().and_then(|stream| {
            spawn_peer_writer(stream, outbound, self.write_timeout, self.logger.clone())
        }) {
            Ok(writer) => writer,
            Err(e) => {
                self.close();
                return Err(e);
            }
        };

        if self.message_handler.register_session(&session, outbox) == RegistrationOutcome::Rejected
        {
            self.finish(writer);
            return Ok(());
        }

        let message_handler = self.message_handler.clone();
        let outcome = run_guarded(
            || self.run(&session),
            || {
                message_handler.cleanup_session(&session);
            },
        );
        self.finish(writer);

        match outcome {
            Ok(Ok(SessionEnd::Disconnected)) => Ok(()),
            Ok(Ok(SessionEnd::TruncatedPayload)) => {
                self.logger.warn(&format!(
                    "Connection of {} ended inside a voice payload",
                    session.user_id
                ));
                Ok(())
            }
            Ok(Ok(SessionEnd::Superseded)) => {
                self.logger.info(&format!(
                    "Session {} of {} ended after being replaced",
                    session.session_id, session.user_id
                ));
                Ok(())
            }
            Ok(Err(e)) => Err(io::Error::other(format!(
                "Session of {} failed: {}",
                session.user_id, e
            ))),
            Err(panic) => {
                self.logger.error(&format!(
                    "Exception with client {}: {}",
                    self.peer_addr,
                    panic_message(panic.as_ref())
                ));
                Ok(())
            }
        }
    }

    /// Expects `REGISTER <id>` as the very first line.
    fn read_registration(&mut self) -> protocol::Result<Option<SessionContext>> {
        let Some(line) = self.reader.read_line()? else {
            self.logger.info(&format!(
                "Connection from {} closed before registering",
                self.peer_addr
            ));
            return Ok(None);
        };

        match parse_registration(&line) {
            Some(user_id) => Ok(Some(SessionContext::new(user_id))),
            None => {
                self.logger.warn(&format!(
                    "Invalid registration from {}: {}",
                    self.peer_addr, line
                ));
                Ok(None)
            }
        }
    }

    fn run(&mut self, session: &SessionContext) -> protocol::Result<SessionEnd> {
        loop {
            let Some(line) = self.reader.read_line()? else {
                return Ok(SessionEnd::Disconnected);
            };

            let command = match parse_command(&line) {
                ParsedLine::Command(command) => command,
                ParsedLine::VoiceHeader => {
                    // Consumed even when no call is active, to keep framing
                    match self.reader.read_chunk(self.chunk_size)? {
                        Some(payload) => Command::Voice { payload },
                        None => return Ok(SessionEnd::TruncatedPayload),
                    }
                }
                ParsedLine::Blank => continue,
                ParsedLine::MissingArgument(keyword) => {
                    self.logger.warn(&format!(
                        "{} from {} is missing its argument",
                        keyword, session.user_id
                    ));
                    continue;
                }
                ParsedLine::Unknown(line) => {
                    self.logger.warn(&format!(
                        "Unknown command from {}: {}",
                        session.user_id, line
                    ));
                    continue;
                }
            };

            if self.message_handler.process_command(session, command) == Dispatch::Superseded {
                return Ok(SessionEnd::Superseded);
            }
        }
    }

    fn close(&self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }

    /// Stops reading, waits for the writer to flush what is already queued,
    /// then closes. The writer exits once the session's outbox has been
    /// dropped from the registry.
    fn finish(&self, writer: JoinHandle<()>) {
        let _ = self.stream.shutdown(Shutdown::Read);
        let _ = writer.join();
        self.close();
    }
}

/// Runs `body`, then `cleanup`, even if `body` panics.
fn run_guarded<T>(body: impl FnOnce() -> T, cleanup: impl FnOnce()) -> thread::Result<T> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(body));
    cleanup();
    outcome
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
