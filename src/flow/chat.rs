//! Chat-mode session: one question at a time, paced by timed transitions.
//!
//! The session is an explicit state machine. `AwaitingInput` is the only
//! state that accepts a submission; every timed transition (typing
//! indicator, pacing between questions) keeps the session in a busy state so
//! duplicate triggers — keyboard and click firing the same action — land as
//! rejected no-ops instead of racing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use tokio::time::sleep;

use crate::analytics::{params, AnalyticsContext};
use crate::capture::{LeadSink, LeadSubmission};
use crate::config::EngineConfig;
use crate::error::{CaptureError, ValidationError};
use crate::flow::answers::AnswerSet;
use crate::flow::input;
use crate::flow::model::{AnswerValue, FlowConfig};
use crate::flow::presenter::Presenter;
use crate::surface::Surface;

/// Where a chat session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A question presentation (typing indicator) is in flight.
    Presenting,
    /// Waiting for an answer to the question at `index`.
    AwaitingInput { index: usize },
    /// An accepted answer is being paced toward the next question.
    Transitioning,
    /// Every question answered; the completion callback has fired.
    Complete,
}

impl Phase {
    /// Busy means any state that must reject submissions.
    pub fn is_busy(&self) -> bool {
        !matches!(self, Phase::AwaitingInput { .. })
    }
}

/// Result of a submission attempt. Rejections are deliberate no-ops: the
/// answer set and position are untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Recorded; the next question has been presented.
    Accepted,
    /// Recorded; this was the final question and completion fired.
    Completed,
    /// A transition was in flight (or the session is done).
    RejectedBusy,
    /// The id does not match the question currently awaiting input.
    RejectedWrongQuestion,
    /// The value failed type-specific validation.
    RejectedInvalid(ValidationError),
}

/// Result of a lead-capture attempt.
#[derive(Debug)]
pub enum LeadOutcome {
    /// Submission accepted by the sink; thank-you and share prompts shown.
    Delivered,
    /// Email failed the shape check; nothing sent, control stays active.
    Rejected(ValidationError),
    /// Sink failure; a generic inline error was shown. No automatic retry.
    Failed(CaptureError),
}

struct SessionState {
    phase: Phase,
    answers: AnswerSet,
}

/// One in-progress traversal of a flow in chat mode.
pub struct ChatSession {
    flow: Arc<FlowConfig>,
    engine: EngineConfig,
    surface: Arc<dyn Surface>,
    analytics: Arc<AnalyticsContext>,
    state: RwLock<SessionState>,
    /// Set on teardown. In-flight transitions finish silently and never
    /// touch the surface again.
    retired: AtomicBool,
}

impl ChatSession {
    pub fn new(
        flow: Arc<FlowConfig>,
        engine: EngineConfig,
        surface: Arc<dyn Surface>,
        analytics: Arc<AnalyticsContext>,
    ) -> Self {
        Self {
            flow,
            engine,
            surface,
            analytics,
            state: RwLock::new(SessionState {
                phase: Phase::Presenting,
                answers: AnswerSet::new(),
            }),
            retired: AtomicBool::new(false),
        }
    }

    /// Resets session state and presents the first question. Returns once
    /// the question is on the surface.
    pub async fn start(&self) {
        {
            let mut state = self.state.write().await;
            state.answers.clear();
            state.phase = Phase::Presenting;
        }
        self.present_question(0).await;
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase
    }

    /// Snapshot of the answers collected so far.
    pub async fn answers(&self) -> AnswerSet {
        self.state.read().await.answers.clone()
    }

    /// Marks the session as abandoned (mode switch, navigation).
    pub fn retire(&self) {
        self.retired.store(true, Ordering::SeqCst);
    }

    fn is_retired(&self) -> bool {
        self.retired.load(Ordering::SeqCst)
    }

    /// Submits an answer for the question currently awaiting input.
    ///
    /// No-op while busy, for a stale question id, or for a value that fails
    /// validation. On acceptance the echo is shown, the input cleared, and
    /// after the pacing delay the next question (or completion) is
    /// presented before this returns.
    pub async fn submit_answer(
        &self,
        question_id: &str,
        value: AnswerValue,
        display_value: &str,
    ) -> SubmitOutcome {
        if self.is_retired() {
            return SubmitOutcome::RejectedBusy;
        }

        let index = {
            let mut state = self.state.write().await;
            let Phase::AwaitingInput { index } = state.phase else {
                return SubmitOutcome::RejectedBusy;
            };
            let Some(question) = self.flow.question(index) else {
                return SubmitOutcome::RejectedBusy;
            };
            if question.id != question_id {
                return SubmitOutcome::RejectedWrongQuestion;
            }
            if let Err(e) = input::validate(question, &value) {
                return SubmitOutcome::RejectedInvalid(e);
            }
            state.answers.record(question_id, value);
            state.phase = Phase::Transitioning;
            index
        };

        self.surface.show_echo(display_value);
        self.surface.clear_input();
        self.analytics.emit(
            "question_answered",
            params([
                ("question_id", json!(question_id)),
                ("question_number", json!(index + 1)),
                ("tool", json!(self.flow.metadata().tool)),
            ]),
        );

        sleep(self.engine.pacing_delay).await;
        self.present_question(index + 1).await;

        if matches!(self.phase().await, Phase::Complete) {
            SubmitOutcome::Completed
        } else {
            SubmitOutcome::Accepted
        }
    }

    /// Presents the question at `index`, or runs the completion sequence
    /// when the index is past the end.
    async fn present_question(&self, index: usize) {
        if self.is_retired() {
            tracing::debug!(index, "Abandoned presentation on retired session");
            return;
        }
        let total = self.flow.len();
        if index >= total {
            self.complete().await;
            return;
        }

        self.state.write().await.phase = Phase::Presenting;
        self.surface.show_progress(index, total);
        self.surface.show_typing();
        sleep(self.engine.typing_delay).await;

        if self.is_retired() {
            tracing::debug!(index, "Abandoned presentation on retired session");
            return;
        }
        self.surface.clear_typing();

        let Some(question) = self.flow.question(index) else {
            return;
        };
        let emoji = question
            .emoji
            .as_deref()
            .or(self.flow.metadata().emoji.as_deref());
        self.surface.show_prompt(&question.prompt, emoji);
        self.surface.show_input(&input::control_for(question));

        self.state.write().await.phase = Phase::AwaitingInput { index };
        tracing::debug!(index, id = %question.id, "Awaiting input");
    }

    /// Final transition: fires the completion callback exactly once.
    async fn complete(&self) {
        {
            let mut state = self.state.write().await;
            if state.phase == Phase::Complete {
                return;
            }
            state.phase = Phase::Transitioning;
        }

        let total = self.flow.len();
        self.surface.show_progress(total, total);
        self.surface.show_typing();
        sleep(self.engine.completion_delay).await;

        if self.is_retired() {
            tracing::debug!("Abandoned completion on retired session");
            return;
        }
        self.surface.clear_typing();

        let answers = {
            let mut state = self.state.write().await;
            state.phase = Phase::Complete;
            state.answers.clone()
        };

        let presenter = Presenter::new(self.surface.clone(), self.flow.metadata().clone());
        self.flow.fire_completion(&answers, &presenter);
        self.analytics.emit(
            "chat_completed",
            params([("tool", json!(self.flow.metadata().tool))]),
        );
    }

    /// Submits the collected answers plus a contact email to the lead sink.
    ///
    /// Best-effort: failure surfaces a generic inline error and the user may
    /// resubmit; session state is unaffected either way.
    pub async fn submit_lead(&self, email: &str, sink: &dyn LeadSink) -> LeadOutcome {
        if !input::is_valid_email(email) {
            return LeadOutcome::Rejected(ValidationError::InvalidEmail(email.to_string()));
        }

        self.surface.show_echo(email);
        self.surface.clear_input();
        self.analytics.emit(
            "lead_submit",
            params([
                ("email", json!(email)),
                ("tool", json!(self.flow.metadata().tool)),
            ]),
        );

        let submission = LeadSubmission {
            email: email.to_string(),
            tool: self.flow.metadata().tool.clone(),
            answers: self.answers().await,
        };

        match sink.submit(&submission).await {
            Ok(()) => {
                self.surface
                    .show_prompt("Thanks! Check your email for the full report.", Some("✅"));
                self.surface
                    .show_share(&crate::capture::share_links(self.flow.metadata()));
                LeadOutcome::Delivered
            }
            Err(e) => {
                tracing::warn!("Lead submission failed: {e}");
                self.surface
                    .show_error("Oops! Something went wrong. Please try again.");
                LeadOutcome::Failed(e)
            }
        }
    }
}
