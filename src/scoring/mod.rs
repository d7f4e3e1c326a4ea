//! Rule-based scoring engine.
//!
//! Pipeline: normalize reported symptoms → score every condition →
//! filter by per-condition threshold → rank → truncate.
//!
//! Pure and synchronous: no I/O, no shared mutable state. The knowledge
//! base is read-only once built, so one engine can serve any number of
//! concurrent requests.

pub mod confidence;
pub mod knowledge;
pub mod matcher;
pub mod normalize;
pub mod ranker;
pub mod types;

/// Hard ceiling on reported confidence. The engine never claims certainty.
pub const MAX_CONFIDENCE: f64 = 0.95;

pub use confidence::{score_condition, ConditionScore, SymptomMatch};
pub use knowledge::{ConditionEntry, KnowledgeBase, KnowledgeBaseError};
pub use matcher::symptoms_match;
pub use normalize::{normalize_symptom, AliasTable, ReportedSymptoms};
pub use ranker::{ScoringEngine, MAX_RESULTS};
pub use types::{ConditionSymptom, DiagnosisResult, PatientProfile, Severity, SymptomProfile};
