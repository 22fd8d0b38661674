//! Observer system for adapter observability.
//!
//! Observers replace direct console logging: the adapter emits structured
//! [`AdapterEvent`]s and every registered observer receives them in phase
//! order. Observers cannot influence the outcome of an API call.

use crate::types::*;
use std::fmt::Debug;
use std::sync::Arc;

/// Observer execution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverPhase {
    /// Notified before normal observers
    Pre,
    /// Notified in registration order
    Normal,
    /// Notified after normal observers
    Post,
}

/// Observer trait for adapter events.
pub trait Observer: Send + Sync + Debug + 'static {
    /// Observer name
    fn name(&self) -> &str;

    /// Observer execution phase
    fn phase(&self) -> ObserverPhase {
        ObserverPhase::Normal
    }

    /// Receive one event
    fn on_event(&self, ctx: &EventContext, event: &AdapterEvent);
}

/// Observer dispatch engine.
///
/// Holds observers sorted by phase; the sort is stable so registration order
/// is kept within a phase.
#[derive(Debug, Clone)]
pub struct ObserverEngine {
    observers: Vec<Arc<dyn Observer>>,
}

impl ObserverEngine {
    /// Create a new observer engine
    pub fn new(mut observers: Vec<Arc<dyn Observer>>) -> Self {
        observers.sort_by_key(|o| match o.phase() {
            ObserverPhase::Pre => 0,
            ObserverPhase::Normal => 1,
            ObserverPhase::Post => 2,
        });

        Self { observers }
    }

    /// Get all observers
    pub fn observers(&self) -> &[Arc<dyn Observer>] {
        &self.observers
    }

    /// Deliver an event to every observer
    pub fn emit(&self, ctx: &EventContext, event: &AdapterEvent) {
        for observer in &self.observers {
            observer.on_event(ctx, event);
        }
    }
}

impl Default for ObserverEngine {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
