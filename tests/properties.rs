use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

use proptest::prelude::*;
use symptom_triage::scoring::ranker::compare_ranking;
use symptom_triage::scoring::{
    score_condition, symptoms_match, KnowledgeBase, ReportedSymptoms, ScoringEngine, MAX_CONFIDENCE,
    MAX_RESULTS,
};
use symptom_triage::PatientProfile;

const VOCABULARY: &[&str] = &[
    "chest pain",
    "crushing chest pain",
    "pain radiating to left arm",
    "sweating",
    "shortness of breath",
    "can't breathe",
    "wheezing",
    "fever",
    "cough",
    "runny nose",
    "sneezing",
    "sore throat",
    "severe headache",
    "nausea",
    "face drooping",
    "burning urination",
    "fatigue",
    "dizziness",
];

const HISTORY: &[&str] = &["smoking", "diabetes", "high blood pressure", "asthma", "allergies"];

fn engine() -> &'static ScoringEngine {
    static ENGINE: OnceLock<ScoringEngine> = OnceLock::new();
    ENGINE.get_or_init(|| ScoringEngine::new(Arc::new(KnowledgeBase::builtin().unwrap())))
}

fn symptom() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(VOCABULARY).prop_map(String::from),
        1 => "[a-z' ]{0,24}",
    ]
}

fn symptoms() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(symptom(), 0..8)
}

fn profile() -> impl Strategy<Value = PatientProfile> {
    (
        prop::option::of(0u32..100),
        prop::sample::subsequence(HISTORY, 0..=HISTORY.len()),
    )
        .prop_map(|(age, history)| {
            let mut profile = PatientProfile::default().with_history(history);
            profile.age = age;
            profile
        })
}

proptest! {
    #[test]
    fn confidence_always_in_range(symptoms in symptoms(), profile in profile()) {
        let kb = engine().knowledge();
        let reported = ReportedSymptoms::normalize_all(&symptoms, kb.aliases());
        for condition in kb.conditions() {
            let score = score_condition(condition, &reported, &profile);
            prop_assert!(score.confidence >= 0.0);
            prop_assert!(score.confidence <= MAX_CONFIDENCE);
        }
    }

    #[test]
    fn matcher_is_symmetric(a in "[a-zA-Z' ]{0,30}", b in "[a-zA-Z' ]{0,30}") {
        prop_assert_eq!(symptoms_match(&a, &b), symptoms_match(&b, &a));
    }

    #[test]
    fn known_phrases_are_symmetric(a in symptom(), b in symptom()) {
        prop_assert_eq!(symptoms_match(&a, &b), symptoms_match(&b, &a));
    }

    #[test]
    fn diagnose_is_deterministic(symptoms in symptoms(), profile in profile()) {
        let first = engine().diagnose(&symptoms, &profile);
        let second = engine().diagnose(&symptoms, &profile);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn results_bounded_and_sorted(symptoms in symptoms(), profile in profile()) {
        let results = engine().diagnose(&symptoms, &profile);
        prop_assert!(results.len() <= MAX_RESULTS);
        for pair in results.windows(2) {
            prop_assert_ne!(compare_ranking(&pair[0], &pair[1]), Ordering::Greater);
        }
        for result in &results {
            prop_assert!(!result.matched_symptoms.is_empty());
            prop_assert!(result.confidence <= MAX_CONFIDENCE);
        }
    }

    #[test]
    fn empty_input_always_empty(profile in profile()) {
        let empty: Vec<String> = Vec::new();
        prop_assert!(engine().diagnose(&empty, &profile).is_empty());
    }
}
