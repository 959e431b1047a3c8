//! In-memory session store.
//!
//! Entries are never evicted. The map grows by one entry per CAPTCHA fetch
//! for the lifetime of the process; the size is logged on every insert.

use bytes::Bytes;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::portal::UpstreamSession;

/// Opaque identifier handed to clients after a CAPTCHA fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upstream session plus the CAPTCHA it was issued.
#[derive(Debug)]
pub struct SessionEntry {
    upstream: UpstreamSession,
    captcha: Bytes,
}

impl SessionEntry {
    pub fn new(upstream: UpstreamSession, captcha: Bytes) -> Self {
        Self { upstream, captcha }
    }

    pub fn upstream(&self) -> &UpstreamSession {
        &self.upstream
    }

    /// CAPTCHA image bytes captured when the session was created.
    pub fn captcha(&self) -> Bytes {
        self.captcha.clone()
    }
}

/// A thread-safe map of session id -> entry.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, Arc<SessionEntry>>>,
}

impl SessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under `id`.
    pub fn put(&self, id: &SessionId, entry: SessionEntry) {
        self.inner.insert(id.as_str().to_string(), Arc::new(entry));
        tracing::debug!(session_id = %id, sessions = self.inner.len(), "Session stored");
    }

    /// Look up an entry by its client-supplied identifier.
    pub fn get(&self, id: &str) -> Option<Arc<SessionEntry>> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
