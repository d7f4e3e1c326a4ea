use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::explain::ExplanationGenerator;
use crate::scoring::{PatientProfile, ScoringEngine};
use crate::session_store::{SessionId, SessionStore};

// ═══════════════════════════════════════════════════════════
// Shared API context
// ═══════════════════════════════════════════════════════════

/// State shared by every handler.
#[derive(Clone)]
pub struct ApiContext {
    pub engine: ScoringEngine,
    pub sessions: Arc<dyn SessionStore>,
    /// `None` disables explanations and question answering.
    pub explainer: Option<Arc<dyn ExplanationGenerator>>,
}

impl ApiContext {
    pub fn new(engine: ScoringEngine, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            engine,
            sessions,
            explainer: None,
        }
    }

    pub fn with_explainer(mut self, explainer: Arc<dyn ExplanationGenerator>) -> Self {
        self.explainer = Some(explainer);
        self
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response bodies
// ═══════════════════════════════════════════════════════════

/// `POST /api/diagnose` body. Profile fields sit next to `symptoms`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnoseRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(flatten)]
    pub profile: PatientProfile,
}

/// `POST /api/ask` body.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: SessionId,
    pub question: String,
    pub response_text: String,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: String,
    pub features: Vec<&'static str>,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub database_conditions: usize,
    pub ai_enabled: bool,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct ConditionSummary {
    pub name: String,
    pub severity: String,
    pub symptom_count: usize,
    pub key_symptoms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConditionsResponse {
    pub conditions: Vec<ConditionSummary>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnose_request_flattens_profile() {
        let req: DiagnoseRequest = serde_json::from_str(
            r#"{"symptoms":["fever"],"age":40,"medical_history":["smoking"]}"#,
        )
        .unwrap();
        assert_eq!(req.symptoms, vec!["fever".to_string()]);
        assert_eq!(req.profile.age, Some(40));
        assert_eq!(req.profile.medical_history, vec!["smoking".to_string()]);
    }

    #[test]
    fn diagnose_request_defaults_empty() {
        let req: DiagnoseRequest = serde_json::from_str("{}").unwrap();
        assert!(req.symptoms.is_empty());
        assert_eq!(req.profile, PatientProfile::default());
    }

    #[test]
    fn diagnose_request_accepts_null_profile_fields() {
        let req: DiagnoseRequest = serde_json::from_str(
            r#"{"symptoms":["fever"],"age":null,"gender":null,"medical_history":[],"current_medications":[],"allergies":[]}"#,
        )
        .unwrap();
        assert_eq!(req.profile.age, None);
    }

    #[test]
    fn ask_request_question_optional() {
        let req: AskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.question.is_none());
        let req: AskRequest = serde_json::from_str(r#"{"question":"Is ibuprofen safe?"}"#).unwrap();
        assert_eq!(req.question.as_deref(), Some("Is ibuprofen safe?"));
    }

    #[test]
    fn diagnose_request_rejects_wrong_types() {
        assert!(serde_json::from_str::<DiagnoseRequest>(r#"{"symptoms":"fever"}"#).is_err());
        assert!(serde_json::from_str::<DiagnoseRequest>(r#"{"symptoms":[],"age":-3}"#).is_err());
    }
}
