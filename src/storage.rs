//! Session storage port and its adapters.
//!
//! The authentication session only sees [`SessionStorage`]; the web front-end
//! backs it with one map per browser inside a shared [`SessionRegistry`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

pub const PASSCODE_KEY: &str = "passcode";
pub const DISPLAY_NAME_KEY: &str = "displayName";
pub const ROOM_NAME_KEY: &str = "roomName";

/// Key/value storage scoped to one browser session.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    /// Drop everything stored for this session.
    fn clear(&self);
}

/// Process-local storage, shared between clones.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

struct SessionEntry {
    values: HashMap<String, String>,
    last_seen: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            last_seen: Instant::now(),
        }
    }
}

/// All browser sessions known to the front-end, keyed by session cookie
pub struct SessionRegistry {
    sessions: DashMap<Uuid, SessionEntry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop a browser session entirely.
    pub fn forget(&self, session_id: &Uuid) {
        self.sessions.remove(session_id);
    }

    /// Drop sessions untouched for longer than `max_idle`; returns how many went.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() <= max_idle);
        before.saturating_sub(self.sessions.len())
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodically evict idle browser sessions.
pub fn spawn_session_sweeper(
    registry: Arc<SessionRegistry>,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    // Sweep a few times per idle window, at most once a minute.
    let period = (max_idle / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
    tracing::info!(max_idle_secs = max_idle.as_secs(), "Session sweeper configured");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let evicted = registry.evict_idle(max_idle);
            if evicted > 0 {
                tracing::debug!(evicted, remaining = registry.session_count(), "Idle sessions evicted");
            }
        }
    })
}

/// View of one browser's storage inside the registry
#[derive(Clone)]
pub struct BrowserStorage {
    registry: Arc<SessionRegistry>,
    session_id: Uuid,
}

impl BrowserStorage {
    pub fn new(registry: Arc<SessionRegistry>, session_id: Uuid) -> Self {
        Self {
            registry,
            session_id,
        }
    }

}

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        let mut entry = self.registry.sessions.get_mut(&self.session_id)?;
        entry.last_seen = Instant::now();
        entry.values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entry = self
            .registry
            .sessions
            .entry(self.session_id)
            .or_insert_with(SessionEntry::new);
        entry.last_seen = Instant::now();
        entry.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        if let Some(mut entry) = self.registry.sessions.get_mut(&self.session_id) {
            entry.values.remove(key);
        }
    }

    fn clear(&self) {
        self.registry.forget(&self.session_id);
    }
}
