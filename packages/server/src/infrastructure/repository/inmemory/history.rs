//! InMemory HistoryStore implementation.
//!
//! One mutex-guarded map of channel key to message log. Truncation runs
//! after each append, keeping the most recent entries within the limit.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChannelKey, HistoryStore, MessageRecord};

/// Retention limit per conversation channel
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// In-memory HistoryStore implementation
pub struct InMemoryHistoryStore {
    limit: usize,
    channels: Mutex<HashMap<ChannelKey, Vec<MessageRecord>>>,
}

impl InMemoryHistoryStore {
    /// Create a store with the default retention limit
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a store with a custom retention limit (used by tests)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            channels: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, channel: &ChannelKey, message: MessageRecord) {
        let mut channels = self.channels.lock().await;
        let log = channels.entry(channel.clone()).or_default();
        log.push(message);
        if log.len() > self.limit {
            let overflow = log.len() - self.limit;
            log.drain(..overflow);
        }
    }

    async fn read(&self, channel: &ChannelKey) -> Vec<MessageRecord> {
        let channels = self.channels.lock().await;
        channels.get(channel).cloned().unwrap_or_default()
    }
}
