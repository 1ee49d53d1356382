//! Session registry with a configurable disposal policy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use fieldmap_model::{MappingEdit, SessionId};
use fieldmap_report::ReportArtifacts;

use crate::error::{MapError, Result};
use crate::session::{EditOutcome, MappingSession};

/// A session shared between the store and its callers.
pub type SharedSession = Arc<Mutex<MappingSession>>;

/// When stored sessions stop being reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisposalPolicy {
    /// Sessions live until [`SessionStore::dispose`] is called.
    #[default]
    Explicit,
    /// Sessions expire this long after insertion.
    Ttl(Duration),
}

impl DisposalPolicy {
    fn is_expired(&self, inserted_at: Instant) -> bool {
        match self {
            Self::Explicit => false,
            Self::Ttl(ttl) => inserted_at.elapsed() >= *ttl,
        }
    }
}

/// Storage of in-progress review sessions.
///
/// The edit and finalize helpers hold the session lock for the whole batch,
/// so concurrent batches against one session never interleave.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: MappingSession) -> SessionId;

    /// Looks up a live session; expired and disposed ids are not found.
    fn get(&self, id: SessionId) -> Result<SharedSession>;

    /// Removes a session. Returns whether it was present.
    fn dispose(&self, id: SessionId) -> bool;

    /// Drops expired sessions and returns how many were removed.
    fn evict_expired(&self) -> usize;

    fn apply_edits(&self, id: SessionId, edits: &[MappingEdit]) -> Result<EditOutcome> {
        let session = self.get(id)?;
        let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
        session.apply_edits(edits)
    }

    fn finalize(&self, id: SessionId) -> Result<ReportArtifacts> {
        let session = self.get(id)?;
        let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
        session.finalize()
    }
}

struct Entry {
    session: SharedSession,
    inserted_at: Instant,
}

/// Process-local [`SessionStore`].
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    policy: DisposalPolicy,
}

impl InMemorySessionStore {
    pub fn new(policy: DisposalPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> DisposalPolicy {
        self.policy
    }

    /// Number of stored sessions, expired ones included until evicted.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySessionStore")
            .field("sessions", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: MappingSession) -> SessionId {
        let id = session.id();
        let entry = Entry {
            session: Arc::new(Mutex::new(session)),
            inserted_at: Instant::now(),
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, entry);
        debug!(session = %id, "session stored");
        id
    }

    fn get(&self, id: SessionId) -> Result<SharedSession> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(&id) {
            Some(entry) if !self.policy.is_expired(entry.inserted_at) => {
                Ok(Arc::clone(&entry.session))
            }
            _ => Err(MapError::SessionNotFound(id)),
        }
    }

    fn dispose(&self, id: SessionId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            debug!(session = %id, "session disposed");
        }
        removed
    }

    fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| !self.policy.is_expired(entry.inserted_at));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "expired sessions evicted");
        }
        evicted
    }
}
