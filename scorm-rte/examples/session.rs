//! Scripted learner session using the scorm-rte meta crate.
//!
//! This demonstrates:
//! 1. Composing an adapter from a store, layers and observers
//! 2. Driving it with the method names content uses (`LMSSetValue`, ...)
//! 3. Resuming a suspended attempt in a second session
//! 4. Bridging an async backend through `BlockingStore`
//!
//! Run with `RUST_LOG=debug cargo run --example session` to see the
//! tracing output of the logging layer and the tracing observer.

use anyhow::{bail, Context};
use async_trait::async_trait;
use scorm_rte::prelude::*;
use scorm_rte::PersistenceInfo;
use std::sync::Arc;
use std::time::Duration;

/// Calls a course makes during one sitting
const FIRST_SITTING: &[(&str, &[&str])] = &[
    ("LMSInitialize", &[""]),
    ("LMSGetValue", &["cmi.core.student_name"]),
    ("LMSGetValue", &["cmi.core.entry"]),
    ("LMSSetValue", &["cmi.core.lesson_location", "module-2/page-4"]),
    ("LMSSetValue", &["cmi.core.lesson_status", "incomplete"]),
    ("LMSSetValue", &["cmi.core.score.raw", "150"]),
    ("LMSGetLastError", &[]),
    ("LMSGetErrorString", &["405"]),
    ("LMSSetValue", &["cmi.core.score.raw", "64"]),
    ("LMSCommit", &[""]),
    ("LMSSetValue", &["cmi.core.exit", "suspend"]),
    ("LMSSetValue", &["cmi.core.session_time", "00:18:42"]),
    ("LMSFinish", &[""]),
];

const SECOND_SITTING: &[(&str, &[&str])] = &[
    ("LMSInitialize", &[""]),
    ("LMSGetValue", &["cmi.core.entry"]),
    ("LMSGetValue", &["cmi.core.lesson_location"]),
    ("LMSSetValue", &["cmi.core.score.raw", "88"]),
    ("LMSSetValue", &["cmi.core.lesson_status", "passed"]),
    ("LMSSetValue", &["cmi.core.session_time", "00:07:10"]),
    ("LMSFinish", &[""]),
    ("LMSGetValue", &["cmi.core.lesson_status"]),
    ("LMSGetLastError", &[]),
];

/// Stand-in for a remote progress API
#[derive(Debug, Default)]
struct RemoteBackend {
    data: tokio::sync::Mutex<DataMap>,
}

#[async_trait]
impl AsyncPersistence for RemoteBackend {
    fn info(&self) -> Arc<PersistenceInfo> {
        PersistenceInfo::new("remote", "Remote progress API")
    }

    async fn load(&self) -> std::result::Result<DataMap, ScormError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(self.data.lock().await.clone())
    }

    async fn save(&self, data: &DataMap) -> std::result::Result<(), ScormError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        *self.data.lock().await = data.clone();
        Ok(())
    }
}

fn build<P: Persistence>(store: P, config: &AdapterConfig) -> RuntimeAdapter {
    RuntimeAdapter::builder(store)
        .layer(RetryLayer::new())
        .layer(LoggingLayer::with_prefix("[demo]"))
        .observer(Arc::new(TracingObserver::new()))
        .config(config.clone())
        .finish()
}

fn play(api: &mut RuntimeAdapter, script: &[(&str, &[&str])]) {
    for (method, args) in script {
        let result = api.dispatch(method, args);
        println!("  {method}({}) -> {result:?}", args.join(", "));
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AdapterConfig::from_json(
        r#"{"learner": {"student_id": "42", "student_name": "Doe, Jane"}}"#,
    )
    .context("demo configuration")?;

    let root = std::env::temp_dir().join("scorm-rte-demo");
    let log = ProgressLogStore::new(&root, "42", "attempt-1");

    println!("first sitting");
    let mut api = build(log.clone(), &config);
    play(&mut api, FIRST_SITTING);

    println!("second sitting");
    let mut api = build(log.clone(), &config);
    play(&mut api, SECOND_SITTING);

    let summary = log.summary()?;
    println!(
        "summary: status={}, score={:?}, complete={}",
        summary.completion_status, summary.score, summary.is_complete
    );
    println!("log entries: {} in {}", log.entries()?.len(), log.path().display());

    let archived = log.archive(root.join("archive"))?;
    println!("archived to {}", archived.display());

    println!("async backend");
    let remote = BlockingStore::from_config(RemoteBackend::default(), &config)?;
    let mut api = build(remote, &config);
    play(&mut api, FIRST_SITTING);

    if api.state() != SessionState::Terminated {
        bail!("session did not terminate: last error {}", api.get_last_error());
    }
    Ok(())
}
