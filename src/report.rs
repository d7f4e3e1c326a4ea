//! Patient-facing report shaping.
//!
//! Turns engine output into the response bodies the HTTP layer returns:
//! a ranked report, a no-match report, or an "analysis unavailable"
//! fallback. Every shape carries next-step guidance.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{DiagnosisResult, Severity};

/// Analysis version reported to clients.
pub const ANALYSIS_VERSION: &str = "3.1-enhanced";

/// Maximum risk factors listed per diagnosis.
const MAX_LISTED_RISK_FACTORS: usize = 5;

pub const DISCLAIMER: &str = "This analysis is for informational purposes only and does not replace professional medical advice";
pub const CONSULT_PROVIDER: &str = "Consider consulting a healthcare provider for proper evaluation";
pub const GENERAL_ADVICE: &str = "Monitor symptoms and seek medical attention if they worsen or persist";
pub const SEE_PROVIDER: &str = "Please consult a healthcare provider";
pub const EMERGENCY_NOTE: &str = "For severe symptoms, seek immediate medical attention";

// ═══════════════════════════════════════════════════════════
// Confidence level
// ═══════════════════════════════════════════════════════════

/// Descriptive bucket for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Moderate,
    #[serde(rename = "Low-Moderate")]
    LowModerate,
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            Self::VeryHigh
        } else if confidence >= 0.6 {
            Self::High
        } else if confidence >= 0.4 {
            Self::Moderate
        } else if confidence >= 0.2 {
            Self::LowModerate
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::LowModerate => "Low-Moderate",
            Self::Low => "Low",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Urgency
// ═══════════════════════════════════════════════════════════

/// Urgency of the whole report, taken from the top-ranked severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyLevel {
    Emergency,
    Urgent,
    Moderate,
    Low,
}

impl UrgencyLevel {
    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical => Self::Emergency,
            Severity::Severe => Self::Urgent,
            Severity::Moderate => Self::Moderate,
            Severity::Mild => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emergency => "EMERGENCY",
            Self::Urgent => "URGENT",
            Self::Moderate => "MODERATE",
            Self::Low => "LOW",
        }
    }

    pub fn immediate_action(&self) -> &'static str {
        match self {
            Self::Emergency => "Seek emergency medical care immediately",
            Self::Urgent => "Seek medical attention today",
            Self::Moderate => "Schedule medical consultation soon",
            Self::Low => "Monitor symptoms, consult if worsening",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Report bodies
// ═══════════════════════════════════════════════════════════

/// One ranked entry of a `DiagnosisReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDiagnosis {
    pub rank: usize,
    pub condition: String,
    pub confidence_percentage: String,
    pub confidence_level: ConfidenceLevel,
    pub matched_symptoms: Vec<String>,
    pub key_indicators: Vec<String>,
    pub severity: String,
    pub recommended_action: String,
    pub additional_info: String,
    pub risk_factors: Vec<String>,
}

/// Full report for a request with at least one qualifying condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub session_id: Option<Uuid>,
    pub timestamp: String,
    pub analysis_version: String,
    pub input_symptoms: Vec<String>,
    pub total_matches: usize,
    pub diagnoses: Vec<RankedDiagnosis>,
    pub urgency_level: UrgencyLevel,
    pub immediate_action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    pub disclaimer: String,
}

impl DiagnosisReport {
    /// Shape engine output. Returns `None` when there is nothing to rank;
    /// use `NoMatchReport` then.
    pub fn build(input_symptoms: &[String], results: &[DiagnosisResult]) -> Option<Self> {
        let top = results.first()?;
        let urgency = UrgencyLevel::from_severity(top.severity);

        let diagnoses = results
            .iter()
            .enumerate()
            .map(|(i, d)| RankedDiagnosis {
                rank: i + 1,
                condition: title_case(&d.condition),
                confidence_percentage: format_percentage(d.confidence),
                confidence_level: ConfidenceLevel::from_confidence(d.confidence),
                matched_symptoms: d.matched_symptoms.clone(),
                key_indicators: d.pathognomonic_symptoms.clone(),
                severity: d.severity.as_str().to_uppercase(),
                recommended_action: d.action.clone(),
                additional_info: d.info.clone(),
                risk_factors: d
                    .risk_factors
                    .iter()
                    .take(MAX_LISTED_RISK_FACTORS)
                    .cloned()
                    .collect(),
            })
            .collect();

        Some(Self {
            session_id: None,
            timestamp: chrono::Local::now().to_rfc3339(),
            analysis_version: ANALYSIS_VERSION.to_string(),
            input_symptoms: input_symptoms.to_vec(),
            total_matches: results.len(),
            diagnoses,
            urgency_level: urgency,
            immediate_action: urgency.immediate_action().to_string(),
            ai_analysis: None,
            disclaimer: DISCLAIMER.to_string(),
        })
    }
}

/// Body returned when no condition qualifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoMatchReport {
    pub message: String,
    pub provided_symptoms: Vec<String>,
    pub recommendation: String,
    pub general_advice: String,
}

impl NoMatchReport {
    pub fn new(provided_symptoms: &[String]) -> Self {
        Self {
            message: "Unable to match symptoms to known conditions".to_string(),
            provided_symptoms: provided_symptoms.to_vec(),
            recommendation: CONSULT_PROVIDER.to_string(),
            general_advice: GENERAL_ADVICE.to_string(),
        }
    }
}

/// Fallback body when analysis fails at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisUnavailable {
    pub error: String,
    pub recommendation: String,
    pub emergency_note: String,
}

impl Default for AnalysisUnavailable {
    fn default() -> Self {
        Self {
            error: "Analysis temporarily unavailable".to_string(),
            recommendation: SEE_PROVIDER.to_string(),
            emergency_note: EMERGENCY_NOTE.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Formatting helpers
// ═══════════════════════════════════════════════════════════

/// `0.725` → `"72.5%"`.
pub fn format_percentage(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// `"urinary tract infection"` → `"Urinary Tract Infection"`.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
