//! Analytics context: named events stamped with visit attribution.
//!
//! The context is constructed explicitly at page-enter and passed by
//! reference; there is no global state. Every emitted event is appended to a
//! rolling log in the persistence surface (newest-last, capped) and forwarded
//! to the injected sink. The sink contract is fire-and-forget: no
//! acknowledgment, no retry.

pub mod attribution;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::store::{keys, KvStore};

pub use attribution::{PageVisit, TrafficSource};

/// Maximum number of events retained in the rolling log.
pub const EVENT_LOG_CAP: usize = 100;

/// One emitted event, as stored and as handed to the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub visitor_id: String,
    pub session_id: Uuid,
    pub source: String,
    pub medium: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

/// Outbound event sink. No acknowledgment expected.
pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: &EventRecord);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn emit(&self, _event: &EventRecord) {}
}

/// Per-visit analytics state: identifiers, classified source, sink handle.
pub struct AnalyticsContext {
    store: Arc<dyn KvStore>,
    sink: Arc<dyn AnalyticsSink>,
    visitor_id: String,
    session_id: Uuid,
    source: TrafficSource,
}

impl AnalyticsContext {
    /// Builds the context for one page visit. The visitor id is loaded from
    /// the store (created and persisted on first visit); the session id is
    /// fresh every time. Store failures degrade to warnings — analytics must
    /// never break the flow.
    pub fn new(store: Arc<dyn KvStore>, sink: Arc<dyn AnalyticsSink>, visit: &PageVisit) -> Self {
        let visitor_id = match store.get(keys::VISITOR_ID) {
            Ok(Some(id)) => id,
            Ok(None) => {
                let id = Uuid::new_v4().to_string();
                if let Err(e) = store.set(keys::VISITOR_ID, &id) {
                    tracing::warn!("Failed to persist visitor id: {e}");
                }
                id
            }
            Err(e) => {
                tracing::warn!("Failed to read visitor id, using transient one: {e}");
                Uuid::new_v4().to_string()
            }
        };

        let source = TrafficSource::classify(visit);
        if let Err(e) = source.record_first_touch(store.as_ref()) {
            tracing::warn!("Failed to persist first-touch attribution: {e}");
        }

        Self {
            store,
            sink,
            visitor_id,
            session_id: Uuid::new_v4(),
            source,
        }
    }

    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn source(&self) -> &TrafficSource {
        &self.source
    }

    /// Emits a named event: stamps attribution onto the payload, appends it
    /// to the rolling log, forwards it to the sink.
    pub fn emit(&self, event: &str, params: Map<String, Value>) {
        let record = EventRecord {
            event: event.to_string(),
            timestamp: Utc::now(),
            visitor_id: self.visitor_id.clone(),
            session_id: self.session_id,
            source: self.source.source.clone(),
            medium: self.source.medium.clone(),
            campaign: self.source.campaign.clone(),
            channel: self.source.channel().to_string(),
            params,
        };

        self.append_to_log(&record);
        self.sink.emit(&record);
    }

    /// Appends to the rolling log, evicting oldest entries past the cap.
    /// A corrupt stored log restarts empty rather than surfacing an error.
    fn append_to_log(&self, record: &EventRecord) {
        let mut log: Vec<EventRecord> = match self.store.get(keys::EVENT_LOG) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Corrupt event log, starting fresh: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read event log: {e}");
                Vec::new()
            }
        };

        log.push(record.clone());
        if log.len() > EVENT_LOG_CAP {
            let excess = log.len() - EVENT_LOG_CAP;
            log.drain(..excess);
        }

        match serde_json::to_string(&log) {
            Ok(raw) => {
                if let Err(e) = self.store.set(keys::EVENT_LOG, &raw) {
                    tracing::warn!("Failed to persist event log: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize event log: {e}"),
        }
    }
}

/// Convenience builder for event parameter maps.
pub fn params<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
