//! Confidence calculation for one condition.
//!
//! confidence = min(0.95, (matched_weight / total_weight + key_bonus) × multiplier)
//!
//! The weight ratio and key-symptom bonus are added before the multiplier,
//! so the uncapped value can exceed 1.0 when several key symptoms match.

use std::collections::HashSet;

use super::knowledge::ConditionEntry;
use super::matcher::symptoms_match;
use super::normalize::ReportedSymptoms;
use super::types::{ConditionSymptom, PatientProfile};
use super::MAX_CONFIDENCE;

/// Bonus per key symptom with at least one matching reported symptom.
pub const KEY_SYMPTOM_BONUS: f64 = 0.2;

/// Multiplier increment per risk factor shared with the patient history.
pub const RISK_FACTOR_BOOST: f64 = 0.1;

/// Multiplier increment for age-sensitive conditions past the age threshold.
pub const AGE_BOOST: f64 = 0.1;

/// Patients strictly older than this get `AGE_BOOST`.
pub const AGE_RISK_THRESHOLD: u32 = 50;

/// Conditions whose likelihood rises with age.
pub const AGE_SENSITIVE_CONDITIONS: &[&str] = &["heart attack", "stroke"];

/// Specificity at or above which a matched symptom is a strong indicator.
pub const PATHOGNOMONIC_SPECIFICITY: f64 = 0.8;

// ═══════════════════════════════════════════════════════════
// Matching
// ═══════════════════════════════════════════════════════════

/// A condition symptom together with the first reported candidate that
/// matched it.
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomMatch<'a> {
    pub symptom: &'a ConditionSymptom,
    /// Normalized candidate that matched.
    pub candidate: &'a str,
    /// Raw phrase the candidate came from.
    pub reported: &'a str,
}

impl SymptomMatch<'_> {
    pub fn is_pathognomonic(&self) -> bool {
        self.symptom.specificity >= PATHOGNOMONIC_SPECIFICITY
    }
}

/// Condition symptoms matched by at least one reported candidate, in
/// knowledge-base order. Each condition symptom appears at most once.
///
/// The only place matching is decided: confidence and the displayed
/// symptom lists both derive from this.
pub fn match_symptoms<'a>(
    condition: &'a ConditionEntry,
    reported: &'a ReportedSymptoms,
) -> Vec<SymptomMatch<'a>> {
    condition
        .symptoms
        .iter()
        .filter_map(|symptom| {
            reported
                .candidates()
                .find(|candidate| symptoms_match(&symptom.phrase, candidate))
                .map(|candidate| SymptomMatch {
                    symptom,
                    candidate,
                    reported: reported.original(candidate).unwrap_or(candidate),
                })
        })
        .collect()
}

/// Number of key symptoms with at least one matching reported candidate.
pub fn matched_key_symptoms(condition: &ConditionEntry, reported: &ReportedSymptoms) -> usize {
    condition
        .key_symptoms
        .iter()
        .filter(|key| reported.candidates().any(|c| symptoms_match(key, c)))
        .count()
}

// ═══════════════════════════════════════════════════════════
// Scoring
// ═══════════════════════════════════════════════════════════

/// Result of scoring one condition against one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionScore<'a> {
    /// In `[0, MAX_CONFIDENCE]`.
    pub confidence: f64,
    /// Mean specificity of the matched symptoms; 0 when nothing matched.
    pub specificity_score: f64,
    pub matches: Vec<SymptomMatch<'a>>,
}

impl ConditionScore<'_> {
    fn unmatched() -> Self {
        Self {
            confidence: 0.0,
            specificity_score: 0.0,
            matches: Vec::new(),
        }
    }
}

/// Score a condition against the normalized reported symptoms.
pub fn score_condition<'a>(
    condition: &'a ConditionEntry,
    reported: &'a ReportedSymptoms,
    profile: &PatientProfile,
) -> ConditionScore<'a> {
    let matches = match_symptoms(condition, reported);
    let total_weight = condition.total_weight();
    if matches.is_empty() || total_weight <= 0.0 {
        return ConditionScore::unmatched();
    }

    let matched_weight: f64 = matches.iter().map(|m| m.symptom.weight).sum();
    let specificity_sum: f64 = matches.iter().map(|m| m.symptom.specificity).sum();
    let key_bonus = matched_key_symptoms(condition, reported) as f64 * KEY_SYMPTOM_BONUS;

    let base_confidence = matched_weight / total_weight + key_bonus;
    let confidence = (base_confidence * patient_multiplier(condition, profile)).min(MAX_CONFIDENCE);

    ConditionScore {
        confidence,
        specificity_score: specificity_sum / matches.len() as f64,
        matches,
    }
}

/// Patient-specific multiplier: starts at 1.0, grows with shared risk
/// factors and, for age-sensitive conditions, with age.
///
/// History entries are compared verbatim against the condition's risk
/// factors. Each distinct shared factor counts once.
pub fn patient_multiplier(condition: &ConditionEntry, profile: &PatientProfile) -> f64 {
    let history: HashSet<&str> = profile.medical_history.iter().map(String::as_str).collect();
    let shared = condition
        .risk_factors
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&history)
        .count();

    let mut multiplier = 1.0 + shared as f64 * RISK_FACTOR_BOOST;

    let age_sensitive = AGE_SENSITIVE_CONDITIONS.contains(&condition.name.as_str());
    if age_sensitive && profile.age.is_some_and(|age| age > AGE_RISK_THRESHOLD) {
        multiplier += AGE_BOOST;
    }

    multiplier
}
