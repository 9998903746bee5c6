//! The conversational flow engine.
//!
//! One validated `FlowConfig` drives two presentations: `ChatSession` walks
//! questions one at a time behind timed transitions, `SurveyRenderer` shows
//! them all at once with per-change persistence. `FlowController` owns the
//! mode switch between them.

pub mod answers;
pub mod chat;
pub mod controller;
pub mod input;
pub mod model;
pub mod presenter;
pub mod survey;

pub use answers::AnswerSet;
pub use chat::{ChatSession, LeadOutcome, Phase, SubmitOutcome};
pub use controller::{FlowController, Mode};
pub use input::InputControl;
pub use model::{
    AnswerValue, ChoiceOption, FlowConfig, FlowMetadata, OnComplete, Question, QuestionKind,
};
pub use presenter::Presenter;
pub use survey::SurveyRenderer;
