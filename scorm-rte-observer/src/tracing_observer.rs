//! Observer that forwards adapter events to `tracing`.

use scorm_rte_core::codes::NO_ERROR;
use scorm_rte_core::observer::{Observer, ObserverPhase};
use scorm_rte_core::types::*;

/// Emits one structured `tracing` event per adapter event.
///
/// Successful calls and state changes are logged at `debug`, failed calls and
/// failed commits at `warn`. Inspection calls (`GetLastError` and friends)
/// are skipped unless `with_inspection_calls` is set.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    inspection_calls: bool,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            inspection_calls: false,
        }
    }

    /// Also log `GetLastError`, `GetErrorString` and `GetDiagnostic`
    pub fn with_inspection_calls(mut self, enabled: bool) -> Self {
        self.inspection_calls = enabled;
        self
    }

    fn is_inspection(call: ApiCall) -> bool {
        matches!(
            call,
            ApiCall::GetLastError | ApiCall::GetErrorString | ApiCall::GetDiagnostic
        )
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for TracingObserver {
    fn name(&self) -> &str {
        "tracing"
    }

    fn phase(&self) -> ObserverPhase {
        ObserverPhase::Post
    }

    fn on_event(&self, ctx: &EventContext, event: &AdapterEvent) {
        match event {
            AdapterEvent::Call {
                call,
                element,
                value,
                result,
                error_code,
            } => {
                if Self::is_inspection(*call) && !self.inspection_calls {
                    return;
                }
                let element = element.as_deref().unwrap_or("");
                let value = value.as_deref().unwrap_or("");

                if error_code == NO_ERROR {
                    tracing::debug!(
                        session = %ctx.session_id,
                        call = call.lms_name(),
                        element,
                        value,
                        result = %result,
                        "scorm call"
                    );
                } else {
                    tracing::warn!(
                        session = %ctx.session_id,
                        call = call.lms_name(),
                        element,
                        value,
                        error_code = %error_code,
                        "scorm call failed"
                    );
                }
            }
            AdapterEvent::StateChanged { from, to } => {
                tracing::debug!(
                    session = %ctx.session_id,
                    from = ?from,
                    to = ?to,
                    "scorm session state changed"
                );
            }
            AdapterEvent::Committed { entries, success } => {
                if *success {
                    tracing::debug!(
                        session = %ctx.session_id,
                        persistence = %ctx.persistence_id,
                        entries,
                        "scorm data committed"
                    );
                } else {
                    tracing::warn!(
                        session = %ctx.session_id,
                        persistence = %ctx.persistence_id,
                        entries,
                        "scorm commit failed"
                    );
                }
            }
        }
    }
}
