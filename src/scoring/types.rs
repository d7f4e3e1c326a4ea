use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Severity
// ═══════════════════════════════════════════════════════════

/// Severity class of a condition. Drives the severity score and the
/// urgency surfaced to the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Severe,
    Moderate,
    Mild,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Severe => "severe",
            Self::Moderate => "moderate",
            Self::Mild => "mild",
        }
    }

    /// Base points before the confidence adjustment.
    pub fn base_score(&self) -> u32 {
        match self {
            Self::Critical => 95,
            Self::Severe => 75,
            Self::Moderate => 50,
            Self::Mild => 25,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Knowledge-base symptom data
// ═══════════════════════════════════════════════════════════

/// Weight and specificity of one symptom for one condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymptomProfile {
    pub weight: f64,
    pub specificity: f64,
}

/// A symptom phrase of a condition with its scoring data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionSymptom {
    pub phrase: String,
    pub weight: f64,
    pub specificity: f64,
}

// ═══════════════════════════════════════════════════════════
// PatientProfile
// ═══════════════════════════════════════════════════════════

/// Caller-supplied patient context. Every field is optional; missing
/// values simply skip the related adjustments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl PatientProfile {
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_history<I, S>(mut self, history: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.medical_history = history.into_iter().map(Into::into).collect();
        self
    }
}

// ═══════════════════════════════════════════════════════════
// DiagnosisResult
// ═══════════════════════════════════════════════════════════

/// One qualifying condition in a differential list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub condition: String,
    /// In `[0, 0.95]`, rounded to 3 decimals.
    pub confidence: f64,
    /// Condition-side phrases, in knowledge-base order.
    pub matched_symptoms: Vec<String>,
    /// Matched symptoms with specificity >= 0.8.
    pub pathognomonic_symptoms: Vec<String>,
    pub severity: Severity,
    pub severity_score: u32,
    pub action: String,
    pub info: String,
    pub risk_factors: Vec<String>,
    /// Mean specificity of the matched symptoms, rounded to 3 decimals.
    pub specificity_score: f64,
}

impl DiagnosisResult {
    /// Primary ranking key: confidence weighted by specificity.
    pub fn ranking_score(&self) -> f64 {
        self.confidence * self.specificity_score
    }
}
