//! TCP transport: line protocol, client sessions and their writer threads.

mod client_handler;
pub mod messages;
mod peer_writer;
pub mod protocol;
mod server;

pub use server::TcpServer;
