//! Answer-set bookkeeping shared by both presentation modes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::flow::model::AnswerValue;

/// Mapping from question id to its recorded answer.
///
/// Insertion order carries no meaning; completeness (key count equals
/// question count) is what drives completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    entries: HashMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, overwriting any prior value for the same question.
    pub fn record(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.entries.insert(question_id.into(), value);
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.entries.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.entries.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether every one of `total` questions has an answer.
    pub fn is_complete(&self, total: usize) -> bool {
        self.entries.len() == total
    }

    /// Progress as a whole percentage, for a progress indicator.
    pub fn percent(&self, total: usize) -> u8 {
        if total == 0 {
            return 100;
        }
        ((self.entries.len() as f64 / total as f64) * 100.0).round() as u8
    }
}
