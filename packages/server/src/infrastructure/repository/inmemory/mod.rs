//! In-memory store implementations.
//!
//! Process-lifetime state only; nothing survives a restart by design.

mod history;
mod identity;

pub use history::{DEFAULT_HISTORY_LIMIT, InMemoryHistoryStore};
pub use identity::InMemoryIdentityRegistry;
