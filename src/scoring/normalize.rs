//! Symptom normalization against the alias table.

use serde::Serialize;

use super::knowledge::KnowledgeBaseError;
use super::matcher::normalize_phrase;

// ═══════════════════════════════════════════════════════════
// AliasTable
// ═══════════════════════════════════════════════════════════

/// Alternate phrasings of one canonical symptom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasEntry {
    pub canonical: String,
    pub aliases: Vec<String>,
}

/// Canonical symptom phrase → alternate phrasings, in authoring order.
///
/// Only widens matching. A phrase that resolves to nothing is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    /// Build a validated table. Phrases are trimmed and lower-cased.
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Result<Self, KnowledgeBaseError> {
        let mut built: Vec<AliasEntry> = Vec::with_capacity(entries.len());

        for (canonical, aliases) in entries {
            let canonical_norm = normalize_phrase(&canonical);
            if canonical_norm.is_empty() {
                return Err(KnowledgeBaseError::InvalidAlias {
                    canonical,
                    reason: "canonical phrase is blank".into(),
                });
            }
            if built.iter().any(|e| e.canonical == canonical_norm) {
                return Err(KnowledgeBaseError::InvalidAlias {
                    canonical,
                    reason: "canonical phrase is listed twice".into(),
                });
            }

            let mut normalized = Vec::with_capacity(aliases.len());
            for alias in &aliases {
                let alias_norm = normalize_phrase(alias);
                // A blank alias would be contained in every phrase.
                if alias_norm.is_empty() {
                    return Err(KnowledgeBaseError::InvalidAlias {
                        canonical,
                        reason: "blank alias".into(),
                    });
                }
                if !normalized.contains(&alias_norm) {
                    normalized.push(alias_norm);
                }
            }

            built.push(AliasEntry {
                canonical: canonical_norm,
                aliases: normalized,
            });
        }

        Ok(Self { entries: built })
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate forms of a reported phrase: the phrase itself (trimmed,
    /// lower-cased) followed by every canonical phrase it resolves to.
    ///
    /// An exact hit on a canonical phrase or one of its aliases ends the
    /// walk. A partial hit (alias contained in the phrase or the phrase
    /// contained in an alias) adds the canonical phrase and keeps going.
    pub fn normalize(&self, raw: &str) -> Vec<String> {
        let phrase = normalize_phrase(raw);
        let mut candidates = vec![phrase.clone()];
        if phrase.is_empty() {
            return candidates;
        }

        for entry in &self.entries {
            if entry.canonical == phrase || entry.aliases.iter().any(|a| *a == phrase) {
                push_unique(&mut candidates, &entry.canonical);
                break;
            }
            let partial = entry
                .aliases
                .iter()
                .any(|a| a.contains(phrase.as_str()) || phrase.contains(a.as_str()));
            if partial {
                push_unique(&mut candidates, &entry.canonical);
            }
        }

        candidates
    }
}

/// Candidate forms of one reported phrase. See `AliasTable::normalize`.
pub fn normalize_symptom(raw: &str, aliases: &AliasTable) -> Vec<String> {
    aliases.normalize(raw)
}

fn push_unique(candidates: &mut Vec<String>, phrase: &str) {
    if !candidates.iter().any(|c| c == phrase) {
        candidates.push(phrase.to_string());
    }
}

// ═══════════════════════════════════════════════════════════
// ReportedSymptoms
// ═══════════════════════════════════════════════════════════

/// Normalized candidates for one request, each mapped back to the raw
/// phrase the user typed.
///
/// When two raw phrases normalize to the same candidate the later raw
/// phrase wins; the candidate keeps its first position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportedSymptoms {
    candidates: Vec<(String, String)>,
}

impl ReportedSymptoms {
    /// Normalize every reported phrase. Blank phrases are dropped.
    pub fn normalize_all<S: AsRef<str>>(symptoms: &[S], aliases: &AliasTable) -> Self {
        let mut reported = Self::default();
        for raw in symptoms {
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            for candidate in aliases.normalize(raw) {
                reported.insert(candidate, raw);
            }
        }
        reported
    }

    fn insert(&mut self, candidate: String, raw: &str) {
        match self.candidates.iter_mut().find(|(c, _)| *c == candidate) {
            Some((_, original)) => *original = raw.to_string(),
            None => self.candidates.push((candidate, raw.to_string())),
        }
    }

    /// Normalized candidates in insertion order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|(c, _)| c.as_str())
    }

    /// Raw phrase a candidate came from.
    pub fn original(&self, candidate: &str) -> Option<&str> {
        self.candidates
            .iter()
            .find(|(c, _)| c == candidate)
            .map(|(_, raw)| raw.as_str())
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        AliasTable::new(vec![
            (
                "shortness of breath".into(),
                vec!["difficulty breathing".into(), "can't breathe".into()],
            ),
            ("fatigue".into(), vec!["tired".into(), "weakness".into()]),
            ("fever".into(), vec!["hot".into(), "temperature".into()]),
        ])
        .unwrap()
    }

    #[test]
    fn unknown_phrase_keeps_only_itself() {
        assert_eq!(table().normalize("  Sneezing "), vec!["sneezing".to_string()]);
    }

    #[test]
    fn exact_alias_resolves_to_canonical() {
        assert_eq!(
            table().normalize("Can't Breathe"),
            vec!["can't breathe".to_string(), "shortness of breath".to_string()]
        );
    }

    #[test]
    fn canonical_phrase_resolves_to_itself_once() {
        assert_eq!(
            table().normalize("fever"),
            vec!["fever".to_string()]
        );
    }

    #[test]
    fn partial_alias_match_adds_canonical() {
        let candidates = table().normalize("arm weakness");
        assert_eq!(candidates, vec!["arm weakness".to_string(), "fatigue".to_string()]);
    }

    #[test]
    fn partial_matches_can_add_several_canonicals() {
        let candidates = table().normalize("tired and hot");
        assert!(candidates.contains(&"fatigue".to_string()));
        assert!(candidates.contains(&"fever".to_string()));
    }

    #[test]
    fn exact_hit_stops_the_walk() {
        // "hot" is an exact alias of fever; nothing after it is consulted.
        let table = AliasTable::new(vec![
            ("fever".into(), vec!["hot".into()]),
            ("hot flush".into(), vec!["hot".into()]),
        ])
        .unwrap();
        assert_eq!(table.normalize("hot"), vec!["hot".to_string(), "fever".to_string()]);
    }

    #[test]
    fn free_function_matches_method() {
        let table = table();
        assert_eq!(normalize_symptom("Tired", &table), table.normalize("Tired"));
    }

    #[test]
    fn blank_phrase_is_not_expanded() {
        assert_eq!(table().normalize("   "), vec![String::new()]);
    }

    #[test]
    fn blank_alias_rejected() {
        let err = AliasTable::new(vec![("fever".into(), vec!["  ".into()])]).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::InvalidAlias { .. }));
    }

    #[test]
    fn duplicate_canonical_rejected() {
        let err = AliasTable::new(vec![
            ("fever".into(), vec!["hot".into()]),
            ("Fever ".into(), vec!["febrile".into()]),
        ])
        .unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::InvalidAlias { .. }));
    }

    #[test]
    fn reported_symptoms_skip_blank_input() {
        let reported = ReportedSymptoms::normalize_all(&["", "   "], &table());
        assert!(reported.is_empty());
    }

    #[test]
    fn reported_symptoms_last_raw_phrase_wins() {
        let reported = ReportedSymptoms::normalize_all(&["Tired", "so tired"], &table());
        assert_eq!(reported.original("fatigue"), Some("so tired"));
        assert_eq!(reported.original("tired"), Some("Tired"));
        let candidates: Vec<&str> = reported.candidates().collect();
        assert_eq!(candidates, vec!["tired", "fatigue", "so tired"]);
    }
}
