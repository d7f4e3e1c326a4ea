//! Short-lived storage of delivered reports and answered questions.
//!
//! Entries are kept in memory only, keyed by a random session id, and
//! disappear after a time-to-live. Nothing here is persisted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::report::DiagnosisReport;
use crate::scoring::PatientProfile;

pub type SessionId = Uuid;

/// Default time-to-live: 30 minutes.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Stored entries above which `put` purges expired ones first.
const PURGE_THRESHOLD: usize = 1000;

/// What a session holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionKind {
    Diagnosis {
        symptoms: Vec<String>,
        profile: PatientProfile,
        report: DiagnosisReport,
    },
    Consultation {
        question: String,
        response_text: String,
    },
}

/// One delivered analysis or answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(flatten)]
    pub kind: SessionKind,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn diagnosis(symptoms: Vec<String>, profile: PatientProfile, report: DiagnosisReport) -> Self {
        Self {
            kind: SessionKind::Diagnosis {
                symptoms,
                profile,
                report,
            },
            created_at: Utc::now(),
        }
    }

    pub fn consultation(question: String, response_text: String) -> Self {
        Self {
            kind: SessionKind::Consultation {
                question,
                response_text,
            },
            created_at: Utc::now(),
        }
    }
}

pub trait SessionStore: Send + Sync {
    /// Store a record under a fresh id. A stored report carries that id.
    fn put(&self, record: SessionRecord) -> SessionId;

    /// `None` when unknown or expired.
    fn get(&self, id: &SessionId) -> Option<SessionRecord>;

    /// Remove a record now. Returns whether it existed.
    fn expire(&self, id: &SessionId) -> bool;

    /// Drop every expired record. Returns how many were dropped.
    fn purge_expired(&self) -> usize;

    /// Stored records, including expired ones not yet purged.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════
// In-memory store
// ═══════════════════════════════════════════════════════════

struct StoredSession {
    record: SessionRecord,
    stored_at: Instant,
}

pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, StoredSession>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, StoredSession>> {
        // A poisoned map still holds valid entries.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_expired(&self, entry: &StoredSession) -> bool {
        entry.stored_at.elapsed() >= self.ttl
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, mut record: SessionRecord) -> SessionId {
        let id = Uuid::new_v4();
        if let SessionKind::Diagnosis { report, .. } = &mut record.kind {
            report.session_id = Some(id);
        }

        let mut sessions = self.lock();
        if sessions.len() > PURGE_THRESHOLD {
            let ttl = self.ttl;
            sessions.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        }
        sessions.insert(
            id,
            StoredSession {
                record,
                stored_at: Instant::now(),
            },
        );

        tracing::debug!(session = %id, stored = sessions.len(), "Session stored");
        id
    }

    fn get(&self, id: &SessionId) -> Option<SessionRecord> {
        let sessions = self.lock();
        sessions
            .get(id)
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| entry.record.clone())
    }

    fn expire(&self, id: &SessionId) -> bool {
        self.lock().remove(id).is_some()
    }

    fn purge_expired(&self) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        let ttl = self.ttl;
        sessions.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Expired sessions purged");
        }
        purged
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
