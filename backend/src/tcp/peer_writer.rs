//! Writer thread draining one session's outgoing queue.

use std::io::{self, Write};
use std::net::{Shutdown, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::infrastructure::outbox::{Outbound, OutboxReceiver};

/// Why the writer stopped.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum WriterExit {
    /// Every sender is gone and the queue is empty
    Drained,
    /// An [`Outbound::Close`] was received
    CloseRequested,
}

/// Writes queued messages in order until the queue is drained or closed.
pub(crate) fn write_outbound<W: Write>(
    writer: &mut W,
    outbound: &OutboxReceiver,
) -> io::Result<WriterExit> {
    while let Ok(item) = outbound.recv() {
        match item {
            Outbound::Message(message) => {
                writer.write_all(&message.encode())?;
                writer.flush()?;
            }
            Outbound::Close => return Ok(WriterExit::CloseRequested),
        }
    }
    Ok(WriterExit::Drained)
}

/// Spawns the dedicated sender for one connection.
///
/// Writes block at most `write_timeout`. A failed write or a close request
/// shuts the socket down in both directions, which also wakes the session's
/// reader so its cleanup runs. A drained queue leaves the socket to the
/// session.
pub(crate) fn spawn_peer_writer(
    stream: TcpStream,
    outbound: OutboxReceiver,
    write_timeout: Duration,
    logger: logging::Logger,
) -> io::Result<JoinHandle<()>> {
    stream.set_write_timeout(Some(write_timeout))?;

    thread::Builder::new()
        .name("peer-writer".to_string())
        .spawn(move || {
            let mut stream = stream;
            match write_outbound(&mut stream, &outbound) {
                Ok(WriterExit::Drained) => {}
                Ok(WriterExit::CloseRequested) => {
                    logger.info("Closing connection on request");
                    let _ = stream.shutdown(Shutdown::Both);
                }
                Err(e) => {
                    logger.warn(&format!("Write to client failed: {}", e));
                    let _ = stream.shutdown(Shutdown::Both);
                }
            }
        })
}
