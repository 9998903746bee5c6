//! Display surface abstraction.
//!
//! The engine pushes structured display calls at the surface and never reads
//! display state back. Implementations must tolerate calls arriving after
//! teardown (an abandoned timed transition may still fire) by treating any
//! missing target as a no-op.

use crate::capture::ShareLinks;
use crate::flow::input::InputControl;
use crate::flow::model::{AnswerValue, Question};

/// One row of a result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub label: String,
    pub value: String,
    /// Visually emphasized rows (e.g. the headline figure).
    pub highlight: bool,
}

impl ResultRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            highlight: false,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }
}

/// Pure output sink for everything the engine wants shown.
pub trait Surface: Send + Sync {
    /// Transient "the bot is typing" indicator.
    fn show_typing(&self);
    fn clear_typing(&self);

    /// A question prompt (chat bubble).
    fn show_prompt(&self, text: &str, emoji: Option<&str>);

    /// The input control for the current question.
    fn show_input(&self, control: &InputControl);
    fn clear_input(&self);

    /// Echo of what the user just submitted.
    fn show_echo(&self, text: &str);

    /// Progress indicator update.
    fn show_progress(&self, answered: usize, total: usize);

    /// One survey-mode question card, with any restored answer preselected.
    fn show_survey_card(&self, question: &Question, restored: Option<&AnswerValue>);

    /// Mark a survey card as answered.
    fn mark_answered(&self, question_id: &str);

    /// Final result card.
    fn show_result_card(&self, rows: &[ResultRow]);

    /// Share prompts after a successful lead capture.
    fn show_share(&self, links: &ShareLinks);

    /// Inline, user-visible error message.
    fn show_error(&self, message: &str);

    /// Tear down everything shown so far (mode switch).
    fn clear_all(&self);
}

/// Surface that drops everything. Stands in for a torn-down display.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn show_typing(&self) {}
    fn clear_typing(&self) {}
    fn show_prompt(&self, _text: &str, _emoji: Option<&str>) {}
    fn show_input(&self, _control: &InputControl) {}
    fn clear_input(&self) {}
    fn show_echo(&self, _text: &str) {}
    fn show_progress(&self, _answered: usize, _total: usize) {}
    fn show_survey_card(&self, _question: &Question, _restored: Option<&AnswerValue>) {}
    fn mark_answered(&self, _question_id: &str) {}
    fn show_result_card(&self, _rows: &[ResultRow]) {}
    fn show_share(&self, _links: &ShareLinks) {}
    fn show_error(&self, _message: &str) {}
    fn clear_all(&self) {}
}
