//! TCP server accepting voice relay clients.

use std::io;
use std::net::TcpListener;
use std::thread;

use crate::application::handlers::MessageHandler;
use crate::config::ServerConfig;
use crate::infrastructure::storage::Storage;

use super::client_handler::ClientHandler;

/// TCP Server for persistent client connections, one thread per session
pub struct TcpServer {
    message_handler: MessageHandler,
    config: ServerConfig,
    logger: logging::Logger,
}

impl TcpServer {
    pub fn new(storage: Storage, config: ServerConfig, logger: logging::Logger) -> Self {
        let message_handler = MessageHandler::new(
            storage,
            config.duplicate_registration,
            logger.for_component("Dispatcher"),
        );

        TcpServer {
            message_handler,
            config,
            logger,
        }
    }

    /// Binds the configured address and serves until accepting fails.
    pub fn start(&self) -> io::Result<()> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)?;
        self.serve(listener)
    }

    /// Accept loop over an already bound listener.
    ///
    /// An accept failure is logged and ends the loop; sessions already
    /// running are left alone.
    pub fn serve(&self, listener: TcpListener) -> io::Result<()> {
        self.logger.info(&format!(
            "TCP Server listening on {}",
            listener.local_addr()?
        ));

        loop {
            let (stream, peer_addr) = match listener.accept() {
                Ok(accepted) => accepted,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.logger
                        .error(&format!("Server error: {}; no longer accepting", e));
                    return Err(e);
                }
            };

            let message_handler = self.message_handler.clone();
            let config = self.config.clone();
            let logger = self.logger.for_component("ClientHandler");

            let spawned = thread::Builder::new()
                .name(format!("session-{}", peer_addr))
                .spawn(move || {
                    match ClientHandler::new(stream, message_handler, &config, logger.clone()) {
                        Ok(mut handler) => {
                            if let Err(e) = handler.handle() {
                                logger.error(&format!("Client handler error: {}", e));
                            }
                        }
                        Err(e) => {
                            logger.error(&format!("Failed to create client handler: {}", e));
                        }
                    }
                });

            if let Err(e) = spawned {
                self.logger.error(&format!(
                    "Failed to start session thread for {}: {}",
                    peer_addr, e
                ));
            }
        }
    }
}
