//! Audit trail: a synchronous publish/subscribe channel for security-relevant events.
//!
//! Publishers (the credential ledger and the access controller) hand an
//! [`AuditEvent`] to [`AuditChannel::publish`]; every subscriber registered at
//! that moment receives it, in subscription order. A subscriber that fails or
//! panics is logged and skipped; it never affects the operation that published.

mod channel;
mod event;
mod file_logger;
mod memory;

pub use channel::{AuditChannel, AuditSubscriber};
pub use event::{AuditEvent, FileAction};
pub use file_logger::FileLogger;
pub use memory::MemorySink;
