//! Shared routing tables and outbound delivery

pub mod ledger;
pub mod outbox;
pub mod registry;
pub mod storage;
