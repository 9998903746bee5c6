//! Engine pacing configuration.

use std::time::Duration;

/// Timing knobs for chat-mode transitions.
///
/// All waits are one-shot deferred delays on the current task; nothing here
/// spawns background work.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long the typing indicator shows before a question's prompt.
    pub typing_delay: Duration,
    /// Pause between an accepted answer and the next question.
    pub pacing_delay: Duration,
    /// Pause behind the final typing indicator before results appear.
    pub completion_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(500),
            pacing_delay: Duration::from_millis(800),
            completion_delay: Duration::from_millis(1000),
        }
    }
}

impl EngineConfig {
    /// Zero-delay configuration, useful for tests and headless drivers.
    pub fn immediate() -> Self {
        Self {
            typing_delay: Duration::ZERO,
            pacing_delay: Duration::ZERO,
            completion_delay: Duration::ZERO,
        }
    }
}
