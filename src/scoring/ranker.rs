//! Differential ranking: score every condition, keep the ones that clear
//! their own threshold, order them and keep the top few.

use std::cmp::Ordering;
use std::sync::Arc;

use super::confidence::{score_condition, ConditionScore};
use super::knowledge::{ConditionEntry, KnowledgeBase};
use super::normalize::ReportedSymptoms;
use super::types::{DiagnosisResult, PatientProfile, Severity};

/// Maximum number of results returned by `diagnose`.
pub const MAX_RESULTS: usize = 5;

/// Severity score growth per unit of confidence.
const SEVERITY_CONFIDENCE_FACTOR: f64 = 0.3;

/// Stateless scoring engine over a shared knowledge base.
///
/// Cheap to clone; safe to call from any number of threads at once.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    knowledge: Arc<KnowledgeBase>,
}

impl ScoringEngine {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Rank conditions for the reported symptoms. Returns at most
    /// `MAX_RESULTS` records, best first; empty when nothing qualifies.
    pub fn diagnose<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        profile: &PatientProfile,
    ) -> Vec<DiagnosisResult> {
        let reported = ReportedSymptoms::normalize_all(symptoms, self.knowledge.aliases());
        if reported.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<DiagnosisResult> = self
            .knowledge
            .conditions()
            .iter()
            .filter_map(|condition| {
                let score = score_condition(condition, &reported, profile);
                qualify(condition, score)
            })
            .collect();

        results.sort_by(compare_ranking);
        results.truncate(MAX_RESULTS);

        tracing::debug!(
            reported = reported.len(),
            results = results.len(),
            top = results.first().map(|r| r.condition.as_str()).unwrap_or("none"),
            "Differential ranked"
        );

        results
    }
}

/// Build the result record for a condition that clears its threshold.
fn qualify(condition: &ConditionEntry, score: ConditionScore<'_>) -> Option<DiagnosisResult> {
    if score.confidence < condition.minimum_confidence || score.matches.is_empty() {
        return None;
    }

    tracing::debug!(
        condition = %condition.name,
        confidence = score.confidence,
        specificity = score.specificity_score,
        matched = score.matches.len(),
        "Condition qualifies"
    );

    let matched_symptoms = score
        .matches
        .iter()
        .map(|m| m.symptom.phrase.clone())
        .collect();
    let pathognomonic_symptoms = score
        .matches
        .iter()
        .filter(|m| m.is_pathognomonic())
        .map(|m| m.symptom.phrase.clone())
        .collect();

    Some(DiagnosisResult {
        condition: condition.name.clone(),
        confidence: round3(score.confidence),
        matched_symptoms,
        pathognomonic_symptoms,
        severity: condition.severity,
        severity_score: severity_score(condition.severity, score.confidence),
        action: condition.action.clone(),
        info: condition.info.clone(),
        risk_factors: condition.risk_factors.clone(),
        specificity_score: round3(score.specificity_score),
    })
}

/// `base_score × (1 + confidence × 0.3)`, truncated.
pub fn severity_score(severity: Severity, confidence: f64) -> u32 {
    (f64::from(severity.base_score()) * (1.0 + confidence * SEVERITY_CONFIDENCE_FACTOR)) as u32
}

/// Descending by `(confidence × specificity, severity_score)`.
pub fn compare_ranking(a: &DiagnosisResult, b: &DiagnosisResult) -> Ordering {
    b.ranking_score()
        .total_cmp(&a.ranking_score())
        .then_with(|| b.severity_score.cmp(&a.severity_score))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
