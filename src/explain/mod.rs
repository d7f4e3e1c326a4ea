//! LLM-backed text: explanations of a ranked differential and answers to
//! free-text medical questions.
//!
//! The scoring engine never calls into this module. The HTTP layer asks a
//! generator for an explanation after ranking; any failure here leaves the
//! report without `ai_analysis`.

pub mod ollama;

use thiserror::Error;

use crate::report::format_percentage;
use crate::scoring::{DiagnosisResult, PatientProfile};

pub use ollama::OllamaExplainer;

/// Conditions included in the explanation prompt.
const PROMPT_CONDITIONS: usize = 3;

const EXPLANATION_SYSTEM_PROMPT: &str = "You are a careful medical assistant. \
You explain rule-based symptom triage results in plain language. \
You never give a definitive diagnosis and always encourage professional care.";

const CONSULTATION_SYSTEM_PROMPT: &str = "You are a responsible and helpful medical AI assistant. Follow these guidelines:

1. Provide clear, accurate general health information
2. Use simple, understandable language
3. Always emphasize that this is general information, not personalized medical advice
4. Strongly recommend consulting healthcare professionals for:
   - Serious symptoms
   - Persistent conditions
   - Emergency situations
   - Medication questions
   - Diagnosis or treatment decisions
5. For emergency symptoms, immediately advise seeking emergency medical care
6. Be empathetic and supportive while maintaining professional boundaries
7. Keep responses concise but comprehensive (aim for 2-3 paragraphs)

If the question is not medical-related, politely redirect to medical topics.";

#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("Cannot connect to Ollama at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Ollama returned error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse Ollama response: {0}")]
    ResponseParsing(String),

    #[error("Empty response returned")]
    EmptyResponse,
}

/// Text generator behind explanations and answers.
pub trait ExplanationGenerator: Send + Sync {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, ExplainError>;
}

/// Ask the generator for an explanation. `None` when there is nothing to
/// explain or the generator fails.
pub fn explain(
    generator: &dyn ExplanationGenerator,
    symptoms: &[String],
    profile: &PatientProfile,
    results: &[DiagnosisResult],
) -> Option<String> {
    if results.is_empty() {
        return None;
    }

    let prompt = build_explanation_prompt(symptoms, profile, results);
    match generator.generate(EXPLANATION_SYSTEM_PROMPT, &prompt) {
        Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => {
            tracing::warn!(error = %ExplainError::EmptyResponse, "Explanation skipped");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Explanation skipped");
            None
        }
    }
}

pub fn build_explanation_prompt(
    symptoms: &[String],
    profile: &PatientProfile,
    results: &[DiagnosisResult],
) -> String {
    let conditions = results
        .iter()
        .take(PROMPT_CONDITIONS)
        .map(|r| format!("{} ({} confidence)", r.condition, format_percentage(r.confidence)))
        .collect::<Vec<_>>()
        .join(", ");

    let age = profile
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "Not specified".to_string());
    let history = if profile.medical_history.is_empty() {
        "None".to_string()
    } else {
        profile.medical_history.join(", ")
    };

    format!(
        "Patient symptoms: {}\n\
         Possible conditions: {}\n\
         Patient age: {}\n\
         Medical history: {}\n\n\
         Provide a brief medical analysis covering:\n\
         1. Clinical reasoning for the top condition\n\
         2. Warning signs to watch for\n\
         3. Recommended next steps\n\
         4. When to seek immediate care",
        symptoms.join(", "),
        conditions,
        age,
        history,
    )
}

/// Answer a free-text medical question under the consultation guidelines.
pub fn answer_question(
    generator: &dyn ExplanationGenerator,
    question: &str,
) -> Result<String, ExplainError> {
    let answer = generator.generate(CONSULTATION_SYSTEM_PROMPT, question.trim())?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(ExplainError::EmptyResponse);
    }
    Ok(answer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Severity;

    struct MockGenerator {
        reply: Result<&'static str, ()>,
    }

    impl ExplanationGenerator for MockGenerator {
        fn generate(&self, _system: &str, _prompt: &str) -> Result<String, ExplainError> {
            self.reply
                .map(String::from)
                .map_err(|_| ExplainError::Connection("http://localhost:11434".into()))
        }
    }

    fn result(condition: &str, confidence: f64) -> DiagnosisResult {
        DiagnosisResult {
            condition: condition.into(),
            confidence,
            matched_symptoms: vec![],
            pathognomonic_symptoms: vec![],
            severity: Severity::Mild,
            severity_score: 25,
            action: String::new(),
            info: String::new(),
            risk_factors: vec![],
            specificity_score: 0.5,
        }
    }

    #[test]
    fn prompt_lists_top_three_conditions() {
        let results = vec![
            result("common cold", 0.752),
            result("pneumonia", 0.3),
            result("migraine", 0.2),
            result("stroke", 0.1),
        ];
        let profile = PatientProfile::default().with_age(34).with_history(["asthma"]);
        let prompt = build_explanation_prompt(&["runny nose".into()], &profile, &results);

        assert!(prompt.contains("Patient symptoms: runny nose"));
        assert!(prompt.contains("common cold (75.2% confidence)"));
        assert!(prompt.contains("migraine (20.0% confidence)"));
        assert!(!prompt.contains("stroke"));
        assert!(prompt.contains("Patient age: 34"));
        assert!(prompt.contains("Medical history: asthma"));
        assert!(prompt.contains("When to seek immediate care"));
    }

    #[test]
    fn prompt_defaults_for_missing_profile() {
        let prompt = build_explanation_prompt(
            &["fever".into()],
            &PatientProfile::default(),
            &[result("pneumonia", 0.4)],
        );
        assert!(prompt.contains("Patient age: Not specified"));
        assert!(prompt.contains("Medical history: None"));
    }

    #[test]
    fn explain_returns_trimmed_text() {
        let generator = MockGenerator { reply: Ok("  Rest and fluids.\n") };
        let text = explain(&generator, &["fever".into()], &PatientProfile::default(), &[result("flu", 0.5)]);
        assert_eq!(text.as_deref(), Some("Rest and fluids."));
    }

    #[test]
    fn explain_failure_is_none() {
        let generator = MockGenerator { reply: Err(()) };
        let text = explain(&generator, &["fever".into()], &PatientProfile::default(), &[result("flu", 0.5)]);
        assert!(text.is_none());
    }

    #[test]
    fn explain_blank_reply_is_none() {
        let generator = MockGenerator { reply: Ok("   ") };
        let text = explain(&generator, &["fever".into()], &PatientProfile::default(), &[result("flu", 0.5)]);
        assert!(text.is_none());
    }

    struct EchoGenerator;

    impl ExplanationGenerator for EchoGenerator {
        fn generate(&self, system: &str, prompt: &str) -> Result<String, ExplainError> {
            Ok(format!("{system}\n---\n{prompt}"))
        }
    }

    #[test]
    fn answer_uses_consultation_guidelines() {
        let answer = answer_question(&EchoGenerator, "  Is a fever of 38C dangerous? ").unwrap();
        assert!(answer.starts_with("You are a responsible and helpful medical AI assistant"));
        assert!(answer.contains("advise seeking emergency medical care"));
        assert!(answer.ends_with("---\nIs a fever of 38C dangerous?"));
    }

    #[test]
    fn answer_propagates_generator_failure() {
        let generator = MockGenerator { reply: Err(()) };
        let err = answer_question(&generator, "What is a migraine?").unwrap_err();
        assert!(matches!(err, ExplainError::Connection(_)));
    }

    #[test]
    fn blank_answer_is_error() {
        let generator = MockGenerator { reply: Ok(" \n") };
        let err = answer_question(&generator, "What is a migraine?").unwrap_err();
        assert!(matches!(err, ExplainError::EmptyResponse));
    }

    #[test]
    fn explain_skips_empty_results() {
        let generator = MockGenerator { reply: Ok("should not be used") };
        assert!(explain(&generator, &["fever".into()], &PatientProfile::default(), &[]).is_none());
    }
}
