//! In-memory wizard session store.
//!
//! Holds the partially-completed form state of one user per wizard kind while
//! the wizard is active. Each Discord interaction is an independent event, so
//! this store is what survives between the round trips of a multi-step flow.
//!
//! The store is a plain constructor-injected object: the two coordinators own
//! one instance each, and tests instantiate throwaway stores freely. A single
//! async mutex serializes all mutations of the map; snapshots are clones, so
//! readers never observe a half-written record. Absence of a session is an
//! ordinary `None`, never an error - every caller treats "no session" as a
//! legitimate state that gets a user-facing notice.

use crate::core::field::FieldValue;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tokio::sync::Mutex;

/// Which wizard a session (or coordinator) belongs to. Sessions of different
/// kinds live in different stores and never collide.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WizardKind {
    /// The seven-step event creation wizard
    EventCreation,
    /// The five-step publication scheduler wizard
    Scheduler,
}

impl fmt::Display for WizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventCreation => write!(f, "event"),
            Self::Scheduler => write!(f, "scheduler"),
        }
    }
}

/// One user's accumulated wizard state.
#[derive(Clone, Debug, PartialEq)]
pub struct WizardSession {
    /// Field name to captured value, in field-name order
    pub data: BTreeMap<String, FieldValue>,
    /// Current position in the step sequence, 1-based
    pub step: u32,
    /// When the session was started
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation; drives idle eviction
    pub updated_at: DateTime<Utc>,
}

impl WizardSession {
    fn new(data: BTreeMap<String, FieldValue>) -> Self {
        let now = Utc::now();
        Self {
            data,
            step: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Per-user session table for one wizard kind.
///
/// At most one live session exists per user; starting a new one silently
/// replaces the old one. All mutating operations on the same user are
/// serialized by the store lock.
#[derive(Debug)]
pub struct SessionStore {
    kind: WizardKind,
    sessions: Mutex<HashMap<u64, WizardSession>>,
}

impl SessionStore {
    /// Creates an empty store for the given wizard kind.
    #[must_use]
    pub fn new(kind: WizardKind) -> Self {
        Self {
            kind,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The wizard kind this store serves.
    #[must_use]
    pub const fn kind(&self) -> WizardKind {
        self.kind
    }

    /// Creates a fresh session for the user, discarding any prior one.
    /// Always succeeds; starting twice keeps only the second call's data.
    pub async fn start(&self, user_id: u64, initial: BTreeMap<String, FieldValue>) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(user_id, WizardSession::new(initial));
        tracing::debug!(user_id, kind = %self.kind, "wizard session started");
    }

    /// Whether a live session exists for the user.
    pub async fn exists(&self, user_id: u64) -> bool {
        self.sessions.lock().await.contains_key(&user_id)
    }

    /// Snapshot of the session's form data only. Callers that need the step
    /// or timestamps use [`SessionStore::snapshot`].
    pub async fn get(&self, user_id: u64) -> Option<BTreeMap<String, FieldValue>> {
        let sessions = self.sessions.lock().await;
        sessions.get(&user_id).map(|s| s.data.clone())
    }

    /// Upserts one field. If the user has no session an empty one is created
    /// first - updates behave as upserts by contract, not by accident.
    pub async fn update(&self, user_id: u64, key: impl Into<String>, value: FieldValue) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| WizardSession::new(BTreeMap::new()));
        session.data.insert(key.into(), value);
        session.updated_at = Utc::now();
    }

    /// Merges multiple fields in one critical section, so a concurrent
    /// mutation on the same user cannot interleave mid-merge.
    pub async fn bulk_update(&self, user_id: u64, payload: BTreeMap<String, FieldValue>) {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| WizardSession::new(BTreeMap::new()));
        session.data.extend(payload);
        session.updated_at = Utc::now();
    }

    /// Increments the step counter. No-op (not an error) if no session exists.
    pub async fn next_step(&self, user_id: u64) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&user_id) {
            session.step += 1;
            session.updated_at = Utc::now();
        }
    }

    /// Sets the step counter directly; used by retreat and draft-resume
    /// jumps. No-op if no session exists.
    pub async fn set_step(&self, user_id: u64, step: u32) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&user_id) {
            session.step = step;
            session.updated_at = Utc::now();
        }
    }

    /// The session's current step, if one exists.
    pub async fn current_step(&self, user_id: u64) -> Option<u32> {
        let sessions = self.sessions.lock().await;
        sessions.get(&user_id).map(|s| s.step)
    }

    /// Removes the session. Idempotent: deleting an absent session is fine.
    pub async fn delete(&self, user_id: u64) {
        let mut sessions = self.sessions.lock().await;
        if sessions.remove(&user_id).is_some() {
            tracing::debug!(user_id, kind = %self.kind, "wizard session deleted");
        }
    }

    /// Full snapshot: data, step and timestamps.
    pub async fn snapshot(&self, user_id: u64) -> Option<WizardSession> {
        let sessions = self.sessions.lock().await;
        sessions.get(&user_id).cloned()
    }

    /// Removes every session idle for longer than `max_idle` and returns how
    /// many were evicted. Run periodically so abandoned wizards do not
    /// accumulate for the lifetime of the process.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at > cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(kind = %self.kind, evicted, "evicted idle wizard sessions");
        }
        evicted
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether the store has no live sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
