//! Observer that records events in memory.

use scorm_rte_core::error::ScormError;
use scorm_rte_core::observer::Observer;
use scorm_rte_core::types::*;
use std::sync::Mutex;

/// One recorded event with the session it came from
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub session_id: String,
    pub event: AdapterEvent,
}

/// Keeps every adapter event, in delivery order.
///
/// Register it as an `Arc` and keep a clone to read the events back.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.lock().clone()
    }

    /// Recorded `Call` events for one API call
    pub fn calls(&self, call: ApiCall) -> Vec<AdapterEvent> {
        self.lock()
            .iter()
            .filter(|r| matches!(&r.event, AdapterEvent::Call { call: c, .. } if *c == call))
            .map(|r| r.event.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Recorded events as JSON lines
    pub fn to_json_lines(&self) -> Result<String, ScormError> {
        let mut out = String::new();
        for recorded in self.lock().iter() {
            out.push_str(&serde_json::to_string(&recorded.event)?);
            out.push('\n');
        }
        Ok(out)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RecordedEvent>> {
        // Poisoned locks still hold valid events
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Observer for RecordingObserver {
    fn name(&self) -> &str {
        "recording"
    }

    fn on_event(&self, ctx: &EventContext, event: &AdapterEvent) {
        self.lock().push(RecordedEvent {
            session_id: ctx.session_id.clone(),
            event: event.clone(),
        });
    }
}
