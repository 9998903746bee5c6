//! Mode switching: chat and survey presentations over one flow.
//!
//! The mode preference outlives flow instances via the persistence surface;
//! in-progress answers do not survive a switch. Retired chat sessions let
//! their pending transitions die quietly instead of racing the new mode.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::analytics::{params, AnalyticsContext};
use crate::config::EngineConfig;
use crate::flow::chat::ChatSession;
use crate::flow::model::FlowConfig;
use crate::flow::survey::SurveyRenderer;
use crate::store::{keys, KvStore};
use crate::surface::Surface;

/// Presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    Survey,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Survey => "survey",
        }
    }

    /// Parses a persisted preference. Unknown values yield `None`; callers
    /// fall back to the default rather than erroring on stale state.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "chat" => Some(Self::Chat),
            "survey" => Some(Self::Survey),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one flow through either presentation mode.
pub struct FlowController {
    flow: Arc<FlowConfig>,
    engine: EngineConfig,
    surface: Arc<dyn Surface>,
    store: Arc<dyn KvStore>,
    analytics: Arc<AnalyticsContext>,
    mode: Mutex<Mode>,
    chat: Mutex<Arc<ChatSession>>,
    survey: Mutex<Arc<SurveyRenderer>>,
}

impl FlowController {
    /// Builds a controller, restoring the persisted mode preference (an
    /// unreadable or unknown preference falls back to chat).
    pub fn new(
        flow: Arc<FlowConfig>,
        engine: EngineConfig,
        surface: Arc<dyn Surface>,
        store: Arc<dyn KvStore>,
        analytics: Arc<AnalyticsContext>,
    ) -> Self {
        let mode = match store.get(keys::MODE_PREFERENCE) {
            Ok(Some(raw)) => Mode::parse(&raw).unwrap_or(Mode::Chat),
            Ok(None) => Mode::Chat,
            Err(e) => {
                tracing::warn!("Failed to read mode preference: {e}");
                Mode::Chat
            }
        };

        let chat = Arc::new(ChatSession::new(
            flow.clone(),
            engine.clone(),
            surface.clone(),
            analytics.clone(),
        ));
        let survey = Arc::new(SurveyRenderer::new(
            flow.clone(),
            surface.clone(),
            store.clone(),
            analytics.clone(),
        ));

        analytics.emit(
            "framework_started",
            params([
                ("mode", json!(mode.as_str())),
                ("tool", json!(flow.metadata().tool)),
            ]),
        );

        Self {
            flow,
            engine,
            surface,
            store,
            analytics,
            mode: Mutex::new(mode),
            chat: Mutex::new(chat),
            survey: Mutex::new(survey),
        }
    }

    pub fn mode(&self) -> Mode {
        *self.mode.lock().unwrap()
    }

    /// The active chat session. Replaced wholesale on every mode switch.
    pub fn chat(&self) -> Arc<ChatSession> {
        self.chat.lock().unwrap().clone()
    }

    /// The active survey renderer. Replaced wholesale on every mode switch.
    pub fn survey(&self) -> Arc<SurveyRenderer> {
        self.survey.lock().unwrap().clone()
    }

    /// Begins (or re-begins) the current mode from scratch.
    pub async fn start(&self) {
        match self.mode() {
            Mode::Chat => self.chat().start().await,
            Mode::Survey => self.survey().render(),
        }
    }

    /// Switches presentation mode. No-op when already in `mode`. The
    /// preference is persisted; in-progress answers are discarded, the
    /// surface is cleared, and the new mode starts from scratch.
    pub async fn switch_mode(&self, mode: Mode) {
        {
            let mut current = self.mode.lock().unwrap();
            if *current == mode {
                return;
            }
            *current = mode;
        }

        if let Err(e) = self.store.set(keys::MODE_PREFERENCE, mode.as_str()) {
            tracing::warn!("Failed to persist mode preference: {e}");
        }

        // Retire the outgoing chat session so pending timed transitions
        // cannot write to the cleared surface, then rebuild both modes with
        // empty answer sets.
        self.chat.lock().unwrap().retire();
        let fresh_chat = Arc::new(ChatSession::new(
            self.flow.clone(),
            self.engine.clone(),
            self.surface.clone(),
            self.analytics.clone(),
        ));
        *self.chat.lock().unwrap() = fresh_chat;
        let fresh_survey = Arc::new(SurveyRenderer::new(
            self.flow.clone(),
            self.surface.clone(),
            self.store.clone(),
            self.analytics.clone(),
        ));
        *self.survey.lock().unwrap() = fresh_survey;

        self.surface.clear_all();
        self.analytics.emit(
            "mode_switched",
            params([
                ("mode", json!(mode.as_str())),
                ("tool", json!(self.flow.metadata().tool)),
            ]),
        );

        self.start().await;
    }
}
