//! Flow configuration: questions, answer values, display metadata.
//!
//! A `FlowConfig` is constructed once per flow instance and never mutated
//! afterwards; both presentation modes borrow it through an `Arc`. All
//! per-kind constraints are checked up front so the engine can trust the
//! configuration at run time.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flow::answers::AnswerSet;
use crate::flow::presenter::Presenter;

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            emoji: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// The typed shape of a question. Each variant carries only the fields that
/// apply to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Fixed `yes` / `no` options.
    YesNo,
    /// One of a configured list of options.
    Choice { options: Vec<ChoiceOption> },
    /// Integer input. `max` is a control hint only; submit-time validation
    /// enforces `min` alone.
    Number {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
        #[serde(default)]
        default: Option<i64>,
    },
    /// Free text, non-empty after trimming.
    Text {
        #[serde(default)]
        default: Option<String>,
    },
    /// Email address, relaxed shape check.
    Email,
}

/// A single question in a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// The prompt shown to the user.
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            emoji: None,
            placeholder: None,
            kind,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// A recorded answer. Yes/no tokens, choice values, and free text all store
/// as strings; number questions store integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Text(String),
}

impl AnswerValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Display metadata for a flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowMetadata {
    /// Human-readable flow title.
    pub title: String,
    /// Tool identifier; scopes persistence keys and tags outbound events.
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Prefilled text for share prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_text: Option<String>,
    /// URL of the hosting page, used in share links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    /// Lead-capture POST endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_endpoint: Option<String>,
}

/// Callback invoked when a session has collected every answer.
///
/// Receives the final answer set and a presenter handle so it can push a
/// result card and an email-capture prompt back through the surface.
pub type OnComplete = Arc<dyn Fn(&AnswerSet, &Presenter) + Send + Sync>;

/// An ordered, validated sequence of questions plus completion behavior.
pub struct FlowConfig {
    questions: Vec<Question>,
    metadata: FlowMetadata,
    on_complete: OnComplete,
}

impl FlowConfig {
    /// Validates and builds a flow configuration.
    ///
    /// Rejects empty flows, duplicate question ids, choice questions without
    /// options, and number bounds with `min > max`.
    pub fn new(
        questions: Vec<Question>,
        metadata: FlowMetadata,
        on_complete: OnComplete,
    ) -> Result<Self, FlowError> {
        if questions.is_empty() {
            return Err(FlowError::NoQuestions);
        }
        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(FlowError::DuplicateQuestionId(question.id.clone()));
            }
            match &question.kind {
                QuestionKind::Choice { options } if options.is_empty() => {
                    return Err(FlowError::NoOptions {
                        id: question.id.clone(),
                    });
                }
                QuestionKind::Number {
                    min: Some(min),
                    max: Some(max),
                    ..
                } if min > max => {
                    return Err(FlowError::InvalidBounds {
                        id: question.id.clone(),
                        min: *min,
                        max: *max,
                    });
                }
                _ => {}
            }
        }
        Ok(Self {
            questions,
            metadata,
            on_complete,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn question_by_id(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Number of questions in the flow.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn metadata(&self) -> &FlowMetadata {
        &self.metadata
    }

    pub(crate) fn fire_completion(&self, answers: &AnswerSet, presenter: &Presenter) {
        (self.on_complete)(answers, presenter);
    }
}

// The completion callback is not Debug; show everything else.
impl fmt::Debug for FlowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowConfig")
            .field("questions", &self.questions)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> OnComplete {
        Arc::new(|_, _| {})
    }

    fn meta() -> FlowMetadata {
        FlowMetadata {
            title: "ROI Calculator".into(),
            tool: "roi".into(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_valid_flow() {
        let flow = FlowConfig::new(
            vec![
                Question::new("q1", "Ready?", QuestionKind::YesNo),
                Question::new(
                    "q2",
                    "Team size?",
                    QuestionKind::Number {
                        min: Some(1),
                        max: Some(500),
                        default: None,
                    },
                ),
            ],
            meta(),
            noop(),
        )
        .unwrap();
        assert_eq!(flow.len(), 2);
        assert_eq!(flow.question_by_id("q2").unwrap().prompt, "Team size?");
    }

    #[test]
    fn rejects_empty_flow() {
        assert!(matches!(
            FlowConfig::new(vec![], meta(), noop()),
            Err(FlowError::NoQuestions)
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = FlowConfig::new(
            vec![
                Question::new("q1", "A?", QuestionKind::YesNo),
                Question::new("q1", "B?", QuestionKind::Email),
            ],
            meta(),
            noop(),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::DuplicateQuestionId(id) if id == "q1"));
    }

    #[test]
    fn rejects_choice_without_options() {
        let err = FlowConfig::new(
            vec![Question::new(
                "q1",
                "Pick one",
                QuestionKind::Choice { options: vec![] },
            )],
            meta(),
            noop(),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::NoOptions { id } if id == "q1"));
    }

    #[test]
    fn rejects_inverted_number_bounds() {
        let err = FlowConfig::new(
            vec![Question::new(
                "q1",
                "How many?",
                QuestionKind::Number {
                    min: Some(10),
                    max: Some(5),
                    default: None,
                },
            )],
            meta(),
            noop(),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::InvalidBounds { min: 10, max: 5, .. }));
    }

    #[test]
    fn question_kind_serde_tags() {
        let q = Question::new("q1", "Ready?", QuestionKind::YesNo);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "yes-no");

        let parsed: Question = serde_json::from_value(serde_json::json!({
            "id": "q2",
            "prompt": "How many seats?",
            "type": "number",
            "min": 1,
            "max": 100
        }))
        .unwrap();
        assert_eq!(
            parsed.kind,
            QuestionKind::Number {
                min: Some(1),
                max: Some(100),
                default: None
            }
        );
    }

    #[test]
    fn answer_value_display_and_serde() {
        assert_eq!(AnswerValue::from(42).to_string(), "42");
        assert_eq!(AnswerValue::from("yes").to_string(), "yes");

        let n: AnswerValue = serde_json::from_str("17").unwrap();
        assert_eq!(n, AnswerValue::Integer(17));
        let s: AnswerValue = serde_json::from_str("\"yes\"").unwrap();
        assert_eq!(s, AnswerValue::Text("yes".into()));
    }
}
