//! Session state layer
//!
//! Holds per-session state in process memory. Each session sits behind
//! its own mutex so concurrent turns for the same identifier serialize
//! (at most one in-flight advance per session) while different sessions
//! proceed fully in parallel.
//!
//! Idle sessions are evicted lazily whenever the store is touched.

use crate::models::Session;
use crate::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Trait for session persistence
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the session for a key, creating it on first contact.
    async fn get_or_create(&self, session_key: &str) -> Result<Arc<Mutex<Session>>>;
    /// Fetch an existing session without creating one.
    async fn get(&self, session_key: &str) -> Result<Option<Arc<Mutex<Session>>>>;
    /// Number of live sessions.
    async fn len(&self) -> usize;
}

/// In-memory session store with idle-timeout eviction
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<Session>>>>>,
    idle_timeout: Duration,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Drop sessions idle longer than the timeout. Runs under the write
    /// lock; called from the mutating paths so growth stays bounded
    /// without a background task.
    async fn evict_idle(&self, sessions: &mut HashMap<String, Arc<Mutex<Session>>>) {
        if self.idle_timeout.is_zero() {
            return;
        }

        let now = Utc::now();
        let mut expired: Vec<String> = Vec::new();

        for (key, slot) in sessions.iter() {
            // A session mid-turn holds its lock; skip it rather than wait
            if let Ok(session) = slot.try_lock() {
                let idle = now.signed_duration_since(session.last_seen);
                if idle.num_seconds() >= self.idle_timeout.as_secs() as i64 {
                    expired.push(key.clone());
                }
            }
        }

        for key in expired {
            debug!(session_key = %key, "Evicting idle session");
            sessions.remove(&key);
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, session_key: &str) -> Result<Arc<Mutex<Session>>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(slot) = sessions.get(session_key) {
                return Ok(Arc::clone(slot));
            }
        }

        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions).await;

        let slot = sessions
            .entry(session_key.to_string())
            .or_insert_with(|| {
                let session_id = stable_uuid_from_string(session_key);
                Arc::new(Mutex::new(Session::new(session_id, session_key)))
            });

        Ok(Arc::clone(slot))
    }

    async fn get(&self, session_key: &str) -> Result<Option<Arc<Mutex<Session>>>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_key).cloned())
    }

    async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}

/// Derive a stable UUID from an arbitrary caller-supplied key so the same
/// session identifier always maps to the same session UUID.
pub fn stable_uuid_from_string(input: &str) -> Uuid {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}
