//! Survey mode: every question visible at once, answers editable in any
//! order, state persisted after each change so a reload resumes exactly.

use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::analytics::{params, AnalyticsContext};
use crate::flow::answers::AnswerSet;
use crate::flow::model::{AnswerValue, FlowConfig};
use crate::flow::presenter::Presenter;
use crate::store::{keys, KvStore};
use crate::surface::Surface;

/// Alternate presentation over the same flow configuration.
///
/// There is no busy gate and no index: controls are independent, answers can
/// be re-edited freely, and completion is purely a matter of every question
/// having an answer. Note that completion therefore fires again when an
/// already-complete answer set is edited further; callers that want
/// once-only behavior must latch it themselves.
pub struct SurveyRenderer {
    flow: Arc<FlowConfig>,
    surface: Arc<dyn Surface>,
    store: Arc<dyn KvStore>,
    analytics: Arc<AnalyticsContext>,
    answers: Mutex<AnswerSet>,
}

impl SurveyRenderer {
    pub fn new(
        flow: Arc<FlowConfig>,
        surface: Arc<dyn Surface>,
        store: Arc<dyn KvStore>,
        analytics: Arc<AnalyticsContext>,
    ) -> Self {
        Self {
            flow,
            surface,
            store,
            analytics,
            answers: Mutex::new(AnswerSet::new()),
        }
    }

    /// Renders every question card, restoring any previously saved answers
    /// for this flow's tool. Idempotent: re-rendering reproduces the same
    /// state from the persistence surface.
    pub fn render(&self) {
        let restored = self.load_saved();
        {
            let mut answers = self.answers.lock().unwrap();
            *answers = restored;
        }

        let answers = self.answers.lock().unwrap();
        for question in self.flow.questions() {
            self.surface
                .show_survey_card(question, answers.get(&question.id));
        }
        self.surface.show_progress(answers.len(), self.flow.len());
    }

    /// Records an answer. Always accepted for a known question id: controls
    /// are independent, so there is nothing to gate on. Overwrites any prior
    /// value and persists the full set immediately.
    pub fn handle_answer(&self, question_id: &str, value: AnswerValue) {
        if self.flow.question_by_id(question_id).is_none() {
            tracing::warn!(question_id, "Ignoring answer for unknown question");
            return;
        }

        let (snapshot, complete) = {
            let mut answers = self.answers.lock().unwrap();
            answers.record(question_id, value);
            (answers.clone(), answers.is_complete(self.flow.len()))
        };

        self.persist(&snapshot);
        self.surface.mark_answered(question_id);
        self.surface.show_progress(snapshot.len(), self.flow.len());
        self.analytics.emit(
            "survey_question_answered",
            params([
                ("question_id", json!(question_id)),
                ("tool", json!(self.flow.metadata().tool)),
            ]),
        );

        // Deliberately unguarded: editing an answer after the set is already
        // complete fires completion again.
        if complete {
            let presenter = Presenter::new(self.surface.clone(), self.flow.metadata().clone());
            self.flow.fire_completion(&snapshot, &presenter);
            self.analytics.emit(
                "survey_completed",
                params([("tool", json!(self.flow.metadata().tool))]),
            );
        }
    }

    /// Answered-count over total, as a whole percentage.
    pub fn progress_percent(&self) -> u8 {
        self.answers.lock().unwrap().percent(self.flow.len())
    }

    /// Snapshot of the current answer set.
    pub fn answers(&self) -> AnswerSet {
        self.answers.lock().unwrap().clone()
    }

    fn storage_key(&self) -> String {
        keys::survey_answers(&self.flow.metadata().tool)
    }

    /// Loads the persisted answer set, dropping answers for question ids
    /// that are no longer part of the flow. Corrupt state falls back to
    /// empty; the user just starts over.
    fn load_saved(&self) -> AnswerSet {
        let raw = match self.store.get(&self.storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AnswerSet::new(),
            Err(e) => {
                tracing::warn!("Failed to read saved survey answers: {e}");
                return AnswerSet::new();
            }
        };
        let saved: AnswerSet = match serde_json::from_str(&raw) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Corrupt saved survey answers, starting over: {e}");
                return AnswerSet::new();
            }
        };

        let mut restored = AnswerSet::new();
        for (id, value) in saved.iter() {
            if self.flow.question_by_id(id).is_some() {
                restored.record(id, value.clone());
            }
        }
        restored
    }

    fn persist(&self, answers: &AnswerSet) {
        match serde_json::to_string(answers) {
            Ok(raw) => {
                if let Err(e) = self.store.set(&self.storage_key(), &raw) {
                    tracing::warn!("Failed to persist survey answers: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize survey answers: {e}"),
        }
    }
}
