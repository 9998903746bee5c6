//! chatflow — dual-mode conversational question flow.
//!
//! Presents a configured sequence of typed questions either one at a time
//! (chat mode) or all at once (survey mode), collects validated answers, and
//! fires a completion callback with the full answer set. Display,
//! persistence, analytics, and lead-capture collaborators are injected
//! traits; the engine itself never touches a screen or the network.

pub mod analytics;
pub mod capture;
pub mod config;
pub mod error;
pub mod flow;
pub mod store;
pub mod surface;

pub use config::EngineConfig;
pub use error::{Error, Result};
