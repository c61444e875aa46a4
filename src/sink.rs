// Typing Sink Module
// Destinations for live typing-indicator updates.

use crate::errors::SinkWriteError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// Identifies one typing indicator: a conversation plus the actor typing in it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Build a key from a conversation id and an operator/actor id
    pub fn from_parts(conversation_id: &str, actor_id: &str) -> Self {
        Self(format!("{}:{}", conversation_id, actor_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SessionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// State of a typing indicator as seen by observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingIndicator {
    pub is_typing: bool,
    pub preview_text: String,
    pub cursor_position: usize,
    pub last_event_at: DateTime<Utc>,
}

impl TypingIndicator {
    /// Indicator while a message is being typed
    pub fn typing(preview_text: impl Into<String>, cursor_position: usize) -> Self {
        Self {
            is_typing: true,
            preview_text: preview_text.into(),
            cursor_position,
            last_event_at: Utc::now(),
        }
    }

    /// Indicator once typing has stopped
    pub fn idle() -> Self {
        Self {
            is_typing: false,
            preview_text: String::new(),
            cursor_position: 0,
            last_event_at: Utc::now(),
        }
    }
}

/// Receives typing-indicator updates keyed by session.
///
/// Writes are idempotent upserts: the latest write for a key wins.
#[async_trait]
pub trait TypingSink: Send + Sync {
    async fn upsert(
        &self,
        session_key: &SessionKey,
        indicator: TypingIndicator,
    ) -> Result<(), SinkWriteError>;

    /// Get a name for this sink (for logging/debugging)
    fn name(&self) -> &str;
}

/// Keeps the latest indicator per session in memory, with optional history
#[derive(Debug, Default)]
pub struct MemorySink {
    latest: RwLock<HashMap<SessionKey, TypingIndicator>>,
    history: Option<RwLock<HashMap<SessionKey, Vec<TypingIndicator>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also record every write, in order
    pub fn with_history() -> Self {
        Self {
            latest: RwLock::new(HashMap::new()),
            history: Some(RwLock::new(HashMap::new())),
        }
    }

    pub fn get(&self, session_key: &SessionKey) -> Option<TypingIndicator> {
        self.latest
            .read()
            .ok()
            .and_then(|map| map.get(session_key).cloned())
    }

    /// All writes for a session (empty unless built with history)
    pub fn history(&self, session_key: &SessionKey) -> Vec<TypingIndicator> {
        self.history
            .as_ref()
            .and_then(|h| h.read().ok().and_then(|map| map.get(session_key).cloned()))
            .unwrap_or_default()
    }

    pub fn sessions(&self) -> Vec<SessionKey> {
        let mut keys: Vec<SessionKey> = self
            .latest
            .read()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

#[async_trait]
impl TypingSink for MemorySink {
    async fn upsert(
        &self,
        session_key: &SessionKey,
        indicator: TypingIndicator,
    ) -> Result<(), SinkWriteError> {
        if let Some(history) = &self.history {
            let mut map = history
                .write()
                .map_err(|e| SinkWriteError::new(session_key.as_str(), e.to_string()))?;
            map.entry(session_key.clone())
                .or_default()
                .push(indicator.clone());
        }

        let mut map = self
            .latest
            .write()
            .map_err(|e| SinkWriteError::new(session_key.as_str(), e.to_string()))?;
        map.insert(session_key.clone(), indicator);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Logs every update through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl TypingSink for TracingSink {
    async fn upsert(
        &self,
        session_key: &SessionKey,
        indicator: TypingIndicator,
    ) -> Result<(), SinkWriteError> {
        tracing::info!(
            session = %session_key,
            is_typing = indicator.is_typing,
            cursor = indicator.cursor_position,
            preview = %indicator.preview_text,
            "Typing indicator"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
