//! Progress events.
//!
//! Every stage reports what it is doing through a [`ProgressSink`]. Events
//! are routed by job id and named `{stage}.{event_type}`, e.g.
//! `hunter.profile_found` or `pipeline.completed`. Publishing never fails
//! the caller: sinks swallow their own errors.

use chrono::{DateTime, Utc};
use scout_model::JobId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Emitting component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Searching and filtering.
    Hunter,
    /// Fit analysis.
    Analyzer,
    /// Outreach preparation.
    Engager,
    Pipeline,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Hunter => "hunter",
            Stage::Analyzer => "analyzer",
            Stage::Engager => "engager",
            Stage::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub job_id: JobId,
    pub stage: Stage,
    pub event_type: String,
    pub payload: Value,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    /// Stage-qualified name, e.g. `hunter.batch_started`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.stage, self.event_type)
    }
}

pub trait ProgressSink: Send + Sync {
    fn publish(&self, event: ProgressEvent);
}

/// Writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn publish(&self, event: ProgressEvent) {
        info!(job_id = %event.job_id, event = %event.name(), "{}", event.message);
    }
}

/// Fans events out to in-process subscribers.
///
/// Slow subscribers lose the oldest events once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<ProgressEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }
}

impl ProgressSink for BroadcastSink {
    fn publish(&self, event: ProgressEvent) {
        if self.sender.send(event).is_err() {
            debug!("Progress event dropped, no subscribers");
        }
    }
}

/// Publishing handle bound to one job and one stage.
#[derive(Clone)]
pub struct EventEmitter {
    job_id: JobId,
    stage: Stage,
    sink: Arc<dyn ProgressSink>,
}

impl EventEmitter {
    pub fn new(job_id: impl Into<JobId>, stage: Stage, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            job_id: job_id.into(),
            stage,
            sink,
        }
    }

    /// Same job and sink, different stage.
    pub fn for_stage(&self, stage: Stage) -> Self {
        Self {
            stage,
            ..self.clone()
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn emit(&self, event_type: &str, message: impl Into<String>, payload: Value) {
        self.sink.publish(ProgressEvent {
            job_id: self.job_id.clone(),
            stage: self.stage,
            event_type: event_type.to_string(),
            payload,
            message: message.into(),
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;

    /// Keeps every published event.
    #[derive(Default)]
    pub(crate) struct MemorySink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl MemorySink {
        pub(crate) fn names(&self) -> Vec<String> {
            self.events.lock().iter().map(ProgressEvent::name).collect()
        }

        pub(crate) fn find(&self, name: &str) -> Option<ProgressEvent> {
            self.events.lock().iter().find(|e| e.name() == name).cloned()
        }

        pub(crate) fn count(&self, name: &str) -> usize {
            self.events.lock().iter().filter(|e| e.name() == name).count()
        }
    }

    impl ProgressSink for MemorySink {
        fn publish(&self, event: ProgressEvent) {
            self.events.lock().push(event);
        }
    }
}
