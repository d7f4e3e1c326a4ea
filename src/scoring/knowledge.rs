//! Condition knowledge base.
//!
//! Authored as JSON (condition name → entry, alias → phrasings), parsed
//! once at startup and validated before the engine sees it. Any
//! structural defect rejects startup.
//!
//! Document order is significant and preserved: conditions are scored in
//! authoring order, and a condition's symptoms are reported in the order
//! they were written.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::matcher::normalize_phrase;
use super::normalize::AliasTable;
use super::types::{ConditionSymptom, Severity, SymptomProfile};
use super::MAX_CONFIDENCE;

/// Threshold applied when a condition does not set `minimum_confidence`.
pub const DEFAULT_MINIMUM_CONFIDENCE: f64 = 0.15;

pub const CONDITIONS_FILE: &str = "conditions.json";
pub const ALIASES_FILE: &str = "symptom_aliases.json";

const BUILTIN_CONDITIONS: &str = include_str!("../../resources/conditions.json");
const BUILTIN_ALIASES: &str = include_str!("../../resources/symptom_aliases.json");

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("Knowledge base load failed ({0}): {1}")]
    Load(String, String),

    #[error("Knowledge base parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Knowledge base has no conditions")]
    Empty,

    #[error("Condition '{0}' is defined twice")]
    DuplicateCondition(String),

    #[error("Condition '{condition}' is invalid: {reason}")]
    InvalidCondition { condition: String, reason: String },

    #[error("Alias entry '{canonical}' is invalid: {reason}")]
    InvalidAlias { canonical: String, reason: String },
}

// ═══════════════════════════════════════════════════════════
// Ordered JSON objects
// ═══════════════════════════════════════════════════════════

/// A JSON object read as a list of entries in document order.
#[derive(Debug)]
struct OrderedMap<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Per-condition fields as authored.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConditionSpec {
    symptoms: OrderedMap<SymptomProfile>,
    #[serde(default)]
    key_symptoms: Vec<String>,
    severity: Severity,
    action: String,
    info: String,
    #[serde(default)]
    risk_factors: Vec<String>,
    #[serde(default = "default_minimum_confidence")]
    minimum_confidence: f64,
}

fn default_minimum_confidence() -> f64 {
    DEFAULT_MINIMUM_CONFIDENCE
}

// ═══════════════════════════════════════════════════════════
// ConditionEntry
// ═══════════════════════════════════════════════════════════

/// One condition: its symptom table, key symptoms and guidance.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionEntry {
    pub name: String,
    pub symptoms: Vec<ConditionSymptom>,
    /// Every entry is also a phrase in `symptoms`.
    pub key_symptoms: Vec<String>,
    pub severity: Severity,
    pub action: String,
    pub info: String,
    pub risk_factors: Vec<String>,
    pub minimum_confidence: f64,
}

impl ConditionEntry {
    pub fn total_weight(&self) -> f64 {
        self.symptoms.iter().map(|s| s.weight).sum()
    }

    pub fn symptom(&self, phrase: &str) -> Option<&ConditionSymptom> {
        self.symptoms.iter().find(|s| s.phrase == phrase)
    }

    fn from_spec(name: String, spec: ConditionSpec) -> Self {
        Self {
            name: normalize_phrase(&name),
            symptoms: spec
                .symptoms
                .0
                .into_iter()
                .map(|(phrase, profile)| ConditionSymptom {
                    phrase: normalize_phrase(&phrase),
                    weight: profile.weight,
                    specificity: profile.specificity,
                })
                .collect(),
            key_symptoms: spec.key_symptoms.iter().map(|k| normalize_phrase(k)).collect(),
            severity: spec.severity,
            action: spec.action,
            info: spec.info,
            risk_factors: spec.risk_factors.iter().map(|r| normalize_phrase(r)).collect(),
            minimum_confidence: spec.minimum_confidence,
        }
    }

    fn validate(&self) -> Result<(), KnowledgeBaseError> {
        let invalid = |reason: String| KnowledgeBaseError::InvalidCondition {
            condition: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("name is blank".into()));
        }
        if self.symptoms.is_empty() {
            return Err(invalid("no symptoms".into()));
        }

        for (i, symptom) in self.symptoms.iter().enumerate() {
            if symptom.phrase.is_empty() {
                return Err(invalid("blank symptom phrase".into()));
            }
            if self.symptoms[..i].iter().any(|s| s.phrase == symptom.phrase) {
                return Err(invalid(format!("symptom '{}' listed twice", symptom.phrase)));
            }
            if !in_unit_interval(symptom.weight) {
                return Err(invalid(format!(
                    "symptom '{}' weight {} outside (0, 1]",
                    symptom.phrase, symptom.weight
                )));
            }
            if !in_unit_interval(symptom.specificity) {
                return Err(invalid(format!(
                    "symptom '{}' specificity {} outside (0, 1]",
                    symptom.phrase, symptom.specificity
                )));
            }
        }

        for (i, key) in self.key_symptoms.iter().enumerate() {
            if self.symptom(key).is_none() {
                return Err(invalid(format!("key symptom '{key}' is not one of its symptoms")));
            }
            if self.key_symptoms[..i].contains(key) {
                return Err(invalid(format!("key symptom '{key}' listed twice")));
            }
        }

        if self.risk_factors.iter().any(|r| r.is_empty()) {
            return Err(invalid("blank risk factor".into()));
        }

        if !(0.0..=MAX_CONFIDENCE).contains(&self.minimum_confidence) {
            return Err(invalid(format!(
                "minimum_confidence {} outside [0, {MAX_CONFIDENCE}]",
                self.minimum_confidence
            )));
        }

        Ok(())
    }
}

fn in_unit_interval(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

// ═══════════════════════════════════════════════════════════
// KnowledgeBase
// ═══════════════════════════════════════════════════════════

/// Validated, immutable condition table plus alias table.
///
/// Share it behind an `Arc`; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    conditions: Vec<ConditionEntry>,
    aliases: AliasTable,
}

impl KnowledgeBase {
    /// Validate and assemble a knowledge base.
    pub fn new(
        conditions: Vec<ConditionEntry>,
        aliases: AliasTable,
    ) -> Result<Self, KnowledgeBaseError> {
        if conditions.is_empty() {
            return Err(KnowledgeBaseError::Empty);
        }
        for (i, condition) in conditions.iter().enumerate() {
            condition.validate()?;
            if conditions[..i].iter().any(|c| c.name == condition.name) {
                return Err(KnowledgeBaseError::DuplicateCondition(condition.name.clone()));
            }
        }
        Ok(Self { conditions, aliases })
    }

    /// The knowledge base bundled with the binary.
    pub fn builtin() -> Result<Self, KnowledgeBaseError> {
        Self::from_json(BUILTIN_CONDITIONS, BUILTIN_ALIASES)
    }

    /// Load `conditions.json` and `symptom_aliases.json` from a directory.
    pub fn load(dir: &Path) -> Result<Self, KnowledgeBaseError> {
        let conditions_path = dir.join(CONDITIONS_FILE);
        let aliases_path = dir.join(ALIASES_FILE);

        let conditions_json = std::fs::read_to_string(&conditions_path).map_err(|e| {
            KnowledgeBaseError::Load(conditions_path.display().to_string(), e.to_string())
        })?;
        let aliases_json = std::fs::read_to_string(&aliases_path).map_err(|e| {
            KnowledgeBaseError::Load(aliases_path.display().to_string(), e.to_string())
        })?;

        Self::from_json(&conditions_json, &aliases_json)
    }

    /// Parse and validate both tables from JSON text.
    pub fn from_json(conditions_json: &str, aliases_json: &str) -> Result<Self, KnowledgeBaseError> {
        let specs: OrderedMap<ConditionSpec> = serde_json::from_str(conditions_json)
            .map_err(|e| KnowledgeBaseError::Parse(CONDITIONS_FILE.into(), e.to_string()))?;
        let alias_entries: OrderedMap<Vec<String>> = serde_json::from_str(aliases_json)
            .map_err(|e| KnowledgeBaseError::Parse(ALIASES_FILE.into(), e.to_string()))?;

        let conditions = specs
            .0
            .into_iter()
            .map(|(name, spec)| ConditionEntry::from_spec(name, spec))
            .collect();
        let aliases = AliasTable::new(alias_entries.0)?;

        Self::new(conditions, aliases)
    }

    /// Conditions in authoring order.
    pub fn conditions(&self) -> &[ConditionEntry] {
        &self.conditions
    }

    pub fn condition(&self, name: &str) -> Option<&ConditionEntry> {
        let name = normalize_phrase(name);
        self.conditions.iter().find(|c| c.name == name)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
