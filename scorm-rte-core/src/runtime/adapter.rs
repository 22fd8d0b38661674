//! RuntimeAdapter implementation.
//!
//! The adapter is an explicitly constructed, single-owner state machine.
//! Every SCORM-facing method returns a plain string and records its outcome
//! in the error register; nothing panics or raises across this boundary.

use crate::codes::{ErrorCodeTable, NO_ERROR};
use crate::config::AdapterConfig;
use crate::error::{ErrorKind, Fault};
use crate::layer::Layer;
use crate::namespace::{array_count, NamespaceTable};
use crate::observer::{Observer, ObserverEngine};
use crate::persistence::Persistence;
use crate::strategy::{select_validation_strategy, ValidationStrategy};
use crate::types::*;
use std::sync::Arc;

const TRUE: &str = "true";
const FALSE: &str = "false";

const SESSION_TIME: &str = "cmi.core.session_time";
const TOTAL_TIME: &str = "cmi.core.total_time";
const EXIT: &str = "cmi.core.exit";
const ENTRY: &str = "cmi.core.entry";

/// Builder for composing an adapter with layers, observers and configuration.
///
/// # Example
///
/// ```ignore
/// let mut api = RuntimeAdapter::builder(JsonFileStore::new(dir, "attempt-1"))
///     .layer(RetryLayer::new())
///     .layer(LoggingLayer::new())
///     .observer(Arc::new(TracingObserver::new()))
///     .config(AdapterConfig::new().with_learner("u-1", "Doe, Jane"))
///     .finish();
///
/// assert_eq!(api.initialize(""), "true");
/// ```
pub struct RuntimeAdapterBuilder<P> {
    persistence: P,
    observers: Vec<Arc<dyn Observer>>,
    config: AdapterConfig,
    namespace: Option<NamespaceTable>,
    error_codes: Option<ErrorCodeTable>,
    validation: Option<Box<dyn ValidationStrategy>>,
}

impl<P: Persistence> RuntimeAdapterBuilder<P> {
    /// Create a new builder with a persistence collaborator
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            observers: Vec::new(),
            config: AdapterConfig::default(),
            namespace: None,
            error_codes: None,
            validation: None,
        }
    }

    /// Add a layer to wrap the persistence
    ///
    /// Each call wraps the previous persistence, so the last layer added is
    /// the outermost.
    pub fn layer<L>(self, layer: L) -> RuntimeAdapterBuilder<L::LayeredPersistence>
    where
        L: Layer<P>,
    {
        RuntimeAdapterBuilder {
            persistence: layer.layer(self.persistence),
            observers: self.observers,
            config: self.config,
            namespace: self.namespace,
            error_codes: self.error_codes,
            validation: self.validation,
        }
    }

    /// Add an observer
    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Set the adapter configuration
    pub fn config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the element namespace table
    ///
    /// Defaults to the SCORM 1.2 data model.
    pub fn namespace(mut self, table: NamespaceTable) -> Self {
        self.namespace = Some(table);
        self
    }

    /// Replace the error code table
    ///
    /// Defaults to the table of the configured SCORM version.
    pub fn error_codes(mut self, table: ErrorCodeTable) -> Self {
        self.error_codes = Some(table);
        self
    }

    /// Set a custom validation strategy
    ///
    /// If not set, the strategy follows `AdapterConfig::validation`.
    pub fn validation_strategy(mut self, strategy: Box<dyn ValidationStrategy>) -> Self {
        self.validation = Some(strategy);
        self
    }

    /// Finish building and create a RuntimeAdapter
    pub fn finish(self) -> RuntimeAdapter {
        let info = self.persistence.info();
        let config = self.config;

        let validation = self
            .validation
            .unwrap_or_else(|| select_validation_strategy(config.validation));
        let error_codes = self
            .error_codes
            .unwrap_or_else(|| config.version.error_codes());
        let ctx = EventContext::new(info.id.clone());

        tracing::debug!(
            "adapter {} created: persistence={}, validation={}",
            ctx.session_id,
            info.id,
            validation.name()
        );

        RuntimeAdapter {
            persistence: Box::new(self.persistence),
            observer_engine: ObserverEngine::new(self.observers),
            validation,
            namespace: self.namespace.unwrap_or_else(NamespaceTable::scorm12),
            error_codes,
            config,
            ctx,
            state: SessionState::NotInitialized,
            store: DataMap::new(),
            dirty: false,
            register: ErrorRegister::default(),
        }
    }
}

/// Last-error register
#[derive(Debug, Clone)]
struct ErrorRegister {
    code: String,
    kind: Option<ErrorKind>,
    diagnostic: String,
}

impl Default for ErrorRegister {
    fn default() -> Self {
        Self {
            code: NO_ERROR.to_string(),
            kind: None,
            diagnostic: String::new(),
        }
    }
}

/// SCORM runtime API adapter.
///
/// Owns the session state, the data model store and the error register.
/// All mutation goes through `&mut self`, so a host that shares the adapter
/// across threads has to wrap it in its own lock.
pub struct RuntimeAdapter {
    persistence: Box<dyn Persistence>,
    observer_engine: ObserverEngine,
    validation: Box<dyn ValidationStrategy>,
    namespace: NamespaceTable,
    error_codes: ErrorCodeTable,
    config: AdapterConfig,
    ctx: EventContext,
    state: SessionState,
    store: DataMap,
    dirty: bool,
    register: ErrorRegister,
}

impl std::fmt::Debug for RuntimeAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeAdapter")
            .field("session_id", &self.ctx.session_id)
            .field("persistence", &self.persistence)
            .field("state", &self.state)
            .field("entries", &self.store.len())
            .field("dirty", &self.dirty)
            .field("last_error", &self.register.code)
            .finish()
    }
}

impl RuntimeAdapter {
    /// Create a new builder
    pub fn builder<P: Persistence>(persistence: P) -> RuntimeAdapterBuilder<P> {
        RuntimeAdapterBuilder::new(persistence)
    }

    // ==================== SCORM API ====================

    /// `LMSInitialize` / `Initialize`
    pub fn initialize(&mut self, parameter: &str) -> String {
        let result = self.try_initialize(parameter).map(|_| TRUE.to_string());
        self.complete(ApiCall::Initialize, None, None, result, FALSE)
    }

    /// `LMSFinish` / `Terminate`
    pub fn terminate(&mut self, parameter: &str) -> String {
        let result = self.try_terminate(parameter).map(|_| TRUE.to_string());
        self.complete(ApiCall::Terminate, None, None, result, FALSE)
    }

    /// `LMSGetValue` / `GetValue`
    pub fn get_value(&mut self, element: &str) -> String {
        let result = self.try_get_value(element);
        self.complete(ApiCall::GetValue, Some(element), None, result, "")
    }

    /// `LMSSetValue` / `SetValue`
    pub fn set_value(&mut self, element: &str, value: &str) -> String {
        let result = self.try_set_value(element, value).map(|_| TRUE.to_string());
        self.complete(ApiCall::SetValue, Some(element), Some(value), result, FALSE)
    }

    /// `LMSCommit` / `Commit`
    pub fn commit(&mut self, parameter: &str) -> String {
        let result = self.try_commit(parameter).map(|_| TRUE.to_string());
        self.complete(ApiCall::Commit, None, None, result, FALSE)
    }

    /// `LMSGetLastError` / `GetLastError`
    pub fn get_last_error(&self) -> String {
        let code = self.register.code.clone();
        self.emit_call(ApiCall::GetLastError, None, None, &code);
        code
    }

    /// `LMSGetErrorString` / `GetErrorString`
    pub fn get_error_string(&self, error_code: &str) -> String {
        let description = self
            .error_codes
            .description(error_code.trim())
            .unwrap_or_default()
            .to_string();
        self.emit_call(ApiCall::GetErrorString, None, None, &description);
        description
    }

    /// `LMSGetDiagnostic` / `GetDiagnostic`
    ///
    /// Returns the diagnostic recorded with the last error when `error_code`
    /// is empty or names that error; "" otherwise.
    pub fn get_diagnostic(&self, error_code: &str) -> String {
        let error_code = error_code.trim();
        let diagnostic = if error_code.is_empty() || error_code == self.register.code {
            self.register.diagnostic.clone()
        } else {
            String::new()
        };
        self.emit_call(ApiCall::GetDiagnostic, None, None, &diagnostic);
        diagnostic
    }

    /// Invoke an API method by name, as an embedding host receives it.
    ///
    /// Both SCORM 1.2 (`LMSGetValue`) and SCORM 2004 (`GetValue`) names are
    /// accepted. Missing arguments are treated as empty strings.
    pub fn dispatch(&mut self, method: &str, args: &[&str]) -> String {
        let arg = |i: usize| args.get(i).copied().unwrap_or("");

        match ApiCall::from_method(method) {
            Some(ApiCall::Initialize) => self.initialize(arg(0)),
            Some(ApiCall::Terminate) => self.terminate(arg(0)),
            Some(ApiCall::GetValue) => self.get_value(arg(0)),
            Some(ApiCall::SetValue) => self.set_value(arg(0), arg(1)),
            Some(ApiCall::Commit) => self.commit(arg(0)),
            Some(ApiCall::GetLastError) => self.get_last_error(),
            Some(ApiCall::GetErrorString) => self.get_error_string(arg(0)),
            Some(ApiCall::GetDiagnostic) => self.get_diagnostic(arg(0)),
            None => {
                tracing::warn!("{} unknown API method: {}", self.ctx.session_id, method);
                self.register = ErrorRegister {
                    code: self
                        .error_codes
                        .code(ErrorKind::GeneralException)
                        .to_string(),
                    kind: Some(ErrorKind::GeneralException),
                    diagnostic: format!("unknown API method '{}'", method),
                };
                String::new()
            }
        }
    }

    // ==================== Host accessors ====================

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether values were set since the last successful commit
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Taxonomy kind of the last error, `None` after a successful call
    pub fn last_error_kind(&self) -> Option<ErrorKind> {
        self.register.kind
    }

    /// Unique id of this adapter instance
    pub fn session_id(&self) -> &str {
        &self.ctx.session_id
    }

    /// Current store contents
    pub fn snapshot(&self) -> &DataMap {
        &self.store
    }

    /// Progress aggregated from the store
    pub fn summary(&self) -> AttemptSummary {
        AttemptSummary::from_data(&self.store)
    }

    /// Name under which content discovers this adapter
    pub fn api_object_name(&self) -> &'static str {
        self.config.version.api_object_name()
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Persistence collaborator information
    pub fn persistence_info(&self) -> Arc<PersistenceInfo> {
        self.persistence.info()
    }

    // ==================== Operations ====================

    fn try_initialize(&mut self, parameter: &str) -> Result<(), Fault> {
        match self.state {
            SessionState::NotInitialized => {}
            SessionState::Initialized => {
                return Err(Fault::new(
                    ErrorKind::AlreadyInitialized,
                    "Initialize called on an active session",
                ))
            }
            SessionState::Terminated => {
                return Err(Fault::new(
                    ErrorKind::AlreadyTerminated,
                    "Initialize called after the session terminated",
                ))
            }
        }
        self.check_argument(parameter)?;

        let loaded = self.persistence.load().map_err(|e| {
            tracing::error!("{} load failed: {}", self.ctx.session_id, e);
            Fault::from(e)
        })?;
        self.seed(loaded);
        self.transition(SessionState::Initialized);
        Ok(())
    }

    fn try_terminate(&mut self, parameter: &str) -> Result<(), Fault> {
        self.require_active("Terminate")?;
        self.check_argument(parameter)?;

        // Work on a copy so a failed flush can be retried without adding the
        // session time twice.
        let mut finalized = self.store.clone();
        let accumulated = accumulate_session_time(&mut finalized);
        let dirty = self.dirty || accumulated;

        if self.config.commit_on_terminate && dirty {
            self.flush(&finalized)?;
            self.dirty = false;
        } else {
            self.dirty = dirty;
        }

        self.store = finalized;
        self.transition(SessionState::Terminated);
        Ok(())
    }

    fn try_get_value(&self, element: &str) -> Result<String, Fault> {
        self.require_active("GetValue")?;

        let resolved = self.validation.resolve(&self.namespace, element)?;
        self.validation.check_read(resolved.as_ref())?;

        if let Some(array) = resolved.as_ref().and_then(|r| r.counted_array.as_deref()) {
            return Ok(array_count(&self.store, array).to_string());
        }

        let value = match self.store.get(element) {
            Some(value) => value.clone(),
            None => resolved
                .map(|r| r.def.default.clone())
                .unwrap_or_default(),
        };
        Ok(value)
    }

    fn try_set_value(&mut self, element: &str, value: &str) -> Result<(), Fault> {
        self.require_active("SetValue")?;

        {
            let resolved = self.validation.resolve(&self.namespace, element)?;
            self.validation
                .check_write(resolved.as_ref(), value, &self.store)?;
        }

        self.store.insert(element.to_string(), value.to_string());
        self.dirty = true;
        Ok(())
    }

    fn try_commit(&mut self, parameter: &str) -> Result<(), Fault> {
        self.require_active("Commit")?;
        self.check_argument(parameter)?;

        if !self.dirty {
            tracing::debug!("{} commit skipped, store is clean", self.ctx.session_id);
            return Ok(());
        }

        self.flush(&self.store)?;
        self.dirty = false;
        Ok(())
    }

    // ==================== Helpers ====================

    fn require_active(&self, operation: &str) -> Result<(), Fault> {
        match self.state {
            SessionState::Initialized => Ok(()),
            SessionState::NotInitialized => Err(Fault::new(
                ErrorKind::NotInitializedYet,
                format!("{} called before Initialize", operation),
            )),
            SessionState::Terminated => Err(Fault::new(
                ErrorKind::NotInitializedYet,
                format!("{} called after Terminate", operation),
            )),
        }
    }

    fn check_argument(&self, parameter: &str) -> Result<(), Fault> {
        if self.config.strict_arguments && !parameter.is_empty() {
            return Err(Fault::new(
                ErrorKind::InvalidArgument,
                format!("expected an empty parameter, got '{}'", parameter),
            ));
        }
        Ok(())
    }

    /// Build the session store from loaded values and learner identity
    fn seed(&mut self, mut loaded: DataMap) {
        let suspended = loaded.get(EXIT).is_some_and(|exit| exit == "suspend");
        let returning = !loaded.is_empty();

        // Per-session values never carry over. Dropping a stored one leaves
        // the session dirty so the next flush clears it in persistence too.
        let mut stale = false;
        for element in [EXIT, SESSION_TIME] {
            stale |= loaded.remove(element).is_some_and(|value| !value.is_empty());
        }

        let mut store = DataMap::new();
        for (element, value) in loaded {
            match self.validation.resolve(&self.namespace, &element) {
                Ok(_) => {
                    store.insert(element, value);
                }
                Err(fault) => {
                    tracing::warn!(
                        "{} dropping loaded value for {}: {}",
                        self.ctx.session_id,
                        element,
                        fault.diagnostic
                    );
                }
            }
        }

        if suspended {
            store.insert(ENTRY.to_string(), "resume".to_string());
        } else if returning {
            store.insert(ENTRY.to_string(), String::new());
        }

        let learner = &self.config.learner;
        if !learner.student_id.is_empty() {
            store.insert("cmi.core.student_id".to_string(), learner.student_id.clone());
        }
        if !learner.student_name.is_empty() {
            store.insert(
                "cmi.core.student_name".to_string(),
                learner.student_name.clone(),
            );
        }

        self.store = store;
        self.dirty = stale;
    }

    fn flush(&self, data: &DataMap) -> Result<(), Fault> {
        let entries = data.len();
        let result = self.persistence.save(data);

        self.observer_engine.emit(
            &self.ctx,
            &AdapterEvent::Committed {
                entries,
                success: result.is_ok(),
            },
        );

        result.map_err(|e| {
            tracing::error!("{} save failed: {}", self.ctx.session_id, e);
            Fault::from(e)
        })
    }

    fn transition(&mut self, to: SessionState) {
        let from = self.state;
        self.state = to;
        tracing::debug!("{} state {:?} -> {:?}", self.ctx.session_id, from, to);
        self.observer_engine
            .emit(&self.ctx, &AdapterEvent::StateChanged { from, to });
    }

    /// Record the outcome in the error register, notify observers and map
    /// failures to the call's sentinel return value
    fn complete(
        &mut self,
        call: ApiCall,
        element: Option<&str>,
        value: Option<&str>,
        result: Result<String, Fault>,
        sentinel: &str,
    ) -> String {
        let output = match result {
            Ok(output) => {
                self.register = ErrorRegister::default();
                output
            }
            Err(fault) => {
                let terminated = self.state == SessionState::Terminated;
                let code = self.error_codes.code_for(fault.kind, call, terminated);
                tracing::debug!(
                    "{} {} failed: code={}, kind={}, {}",
                    self.ctx.session_id,
                    call.lms_name(),
                    code,
                    fault.kind,
                    fault.diagnostic
                );
                self.register = ErrorRegister {
                    code: code.to_string(),
                    kind: Some(fault.kind),
                    diagnostic: fault.diagnostic,
                };
                sentinel.to_string()
            }
        };

        self.emit_call(call, element, value, &output);
        output
    }

    fn emit_call(&self, call: ApiCall, element: Option<&str>, value: Option<&str>, result: &str) {
        self.observer_engine.emit(
            &self.ctx,
            &AdapterEvent::Call {
                call,
                element: element.map(str::to_string),
                value: value.map(str::to_string),
                result: result.to_string(),
                error_code: self.register.code.clone(),
            },
        );
    }
}

/// Add `cmi.core.session_time` to `cmi.core.total_time`.
///
/// Returns whether the total changed.
fn accumulate_session_time(data: &mut DataMap) -> bool {
    let Some(session) = data.get(SESSION_TIME) else {
        return false;
    };
    let total = data
        .get(TOTAL_TIME)
        .map(String::as_str)
        .unwrap_or("0000:00:00");

    match crate::datatype::add_timespans(total, session) {
        Some(sum) if data.get(TOTAL_TIME) != Some(&sum) => {
            data.insert(TOTAL_TIME.to_string(), sum);
            true
        }
        _ => false,
    }
}
