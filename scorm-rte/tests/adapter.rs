//! End-to-end behaviour of the adapter assembled from the built-in crates.

use scorm_rte::prelude::*;
use scorm_rte::NamespaceTable;
use std::sync::Arc;
use std::time::Duration;

fn adapter_with(store: MemoryStore) -> (RuntimeAdapter, Arc<RecordingObserver>) {
    let recorder = Arc::new(RecordingObserver::new());
    let api = RuntimeAdapter::builder(store)
        .layer(RetryLayer::new().with_initial_delay(Duration::from_millis(1)))
        .layer(LoggingLayer::new())
        .observer(recorder.clone())
        .observer(Arc::new(TracingObserver::new()))
        .finish();
    (api, recorder)
}

#[test]
fn test_full_session_is_persisted() {
    let store = MemoryStore::new();
    let (mut api, recorder) = adapter_with(store.clone());

    assert_eq!(api.initialize(""), "true");
    assert_eq!(api.set_value("cmi.core.lesson_status", "completed"), "true");
    assert_eq!(api.commit(""), "true");
    assert_eq!(api.get_value("cmi.core.lesson_status"), "completed");
    assert_eq!(api.terminate(""), "true");

    assert_eq!(api.get_value("cmi.core.lesson_status"), "");
    assert_eq!(api.last_error_kind(), Some(ErrorKind::NotInitializedYet));

    assert_eq!(store.get("cmi.core.lesson_status").as_deref(), Some("completed"));
    assert_eq!(store.save_count(), 1);

    let transitions: Vec<_> = recorder
        .events()
        .into_iter()
        .filter_map(|r| match r.event {
            AdapterEvent::StateChanged { to, .. } => Some(to),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![SessionState::Initialized, SessionState::Terminated]
    );
    assert_eq!(recorder.calls(ApiCall::SetValue).len(), 1);
}

#[test]
fn test_failed_calls_are_reported_to_observers() {
    let (mut api, recorder) = adapter_with(MemoryStore::new());
    api.initialize("");
    api.set_value("cmi.core.score.raw", "150");

    match &recorder.calls(ApiCall::SetValue)[0] {
        AdapterEvent::Call {
            result, error_code, ..
        } => {
            assert_eq!(result, "false");
            assert_eq!(error_code, "405");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_commit_failure_then_recovery() {
    let store = MemoryStore::new();
    let (mut api, recorder) = adapter_with(store.clone());
    api.initialize("");
    api.set_value("cmi.suspend_data", "chapter=3");

    store.set_failing(true);
    assert_eq!(api.commit(""), "false");
    assert_eq!(api.get_last_error(), "101");
    assert!(api.is_dirty());
    assert!(store.get("cmi.suspend_data").is_none());

    store.set_failing(false);
    assert_eq!(api.commit(""), "true");
    assert!(!api.is_dirty());
    assert_eq!(store.get("cmi.suspend_data").as_deref(), Some("chapter=3"));

    let commits: Vec<bool> = recorder
        .events()
        .into_iter()
        .filter_map(|r| match r.event {
            AdapterEvent::Committed { success, .. } => Some(success),
            _ => None,
        })
        .collect();
    assert_eq!(commits, vec![false, true]);
}

#[test]
fn test_second_session_resumes_first() {
    let store = MemoryStore::new();

    let (mut first, _) = adapter_with(store.clone());
    first.initialize("");
    first.set_value("cmi.core.lesson_location", "module-2");
    first.set_value("cmi.core.exit", "suspend");
    first.set_value("cmi.core.session_time", "00:12:30");
    assert_eq!(first.terminate(""), "true");

    let (mut second, _) = adapter_with(store.clone());
    assert_ne!(first.session_id(), second.session_id());
    assert_eq!(second.initialize(""), "true");
    assert_eq!(second.get_value("cmi.core.entry"), "resume");
    assert_eq!(second.get_value("cmi.core.lesson_location"), "module-2");
    assert_eq!(second.get_value("cmi.core.total_time"), "0000:12:30");

    second.set_value("cmi.core.session_time", "00:02:30");
    assert_eq!(second.terminate(""), "true");
    assert_eq!(store.get("cmi.core.total_time").as_deref(), Some("0000:15:00"));
}

#[test]
fn test_progress_log_backed_session() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = ProgressLogStore::new(temp_dir.path(), "42", "7");

    let mut api = RuntimeAdapter::builder(store.clone())
        .config(AdapterConfig::new().with_learner("42", "Doe, Jane"))
        .finish();
    api.initialize("");
    api.set_value("cmi.core.lesson_status", "incomplete");
    api.commit("");
    api.set_value("cmi.core.lesson_status", "passed");
    api.set_value("cmi.core.score.raw", "91");
    api.terminate("");

    let statuses: Vec<String> = store
        .entries()
        .unwrap()
        .into_iter()
        .filter(|e| e.data.element_id == "cmi.core.lesson_status")
        .map(|e| e.data.value)
        .collect();
    assert_eq!(statuses, vec!["incomplete", "passed"]);

    let summary = store.summary().unwrap();
    assert!(summary.is_complete);
    assert_eq!(summary.score, Some(91.0));
    assert_eq!(api.summary(), summary);
}

#[test]
fn test_json_file_store_round_trip() {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut api = RuntimeAdapter::builder(JsonFileStore::new(temp_dir.path(), "attempt-9")).finish();
    api.initialize("");
    api.set_value("cmi.comments", "liked the quiz");
    api.terminate("");

    let mut again =
        RuntimeAdapter::builder(JsonFileStore::new(temp_dir.path(), "attempt-9")).finish();
    again.initialize("");
    assert_eq!(again.get_value("cmi.comments"), "liked the quiz");
    assert_eq!(again.get_value("cmi.core.entry"), "");
}

#[test]
fn test_dispatch_uses_content_method_names() {
    let (mut api, _) = adapter_with(MemoryStore::new());

    assert_eq!(api.api_object_name(), "API");
    assert_eq!(api.dispatch("LMSInitialize", &[""]), "true");
    assert_eq!(
        api.dispatch("LMSSetValue", &["cmi.core.lesson_location", "intro"]),
        "true"
    );
    assert_eq!(api.dispatch("LMSGetValue", &["cmi.core.lesson_location"]), "intro");
    assert_eq!(api.dispatch("LMSGetValue", &["cmi.core.nope"]), "");
    assert_eq!(api.dispatch("LMSGetLastError", &[]), "201");
    assert_eq!(
        api.dispatch("LMSGetErrorString", &["201"]),
        "Invalid argument error"
    );
    assert!(!api.dispatch("LMSGetDiagnostic", &[""]).is_empty());
    assert_eq!(api.dispatch("LMSCommit", &[""]), "true");
    assert_eq!(api.dispatch("LMSFinish", &[""]), "true");
}

#[test]
fn test_configuration_from_json() {
    let config = AdapterConfig::from_json(
        r#"{"validation": "permissive", "learner": {"student_id": "s-1", "student_name": "Lee, Sam"}}"#,
    )
    .unwrap();

    let mut api = RuntimeAdapter::builder(MemoryStore::new())
        .config(config)
        .finish();
    api.initialize("");
    assert_eq!(api.get_value("cmi.core.student_name"), "Lee, Sam");
    assert_eq!(api.set_value("cmi.vendor.flag", "on"), "true");
    assert_eq!(api.get_value("cmi.vendor.flag"), "on");
}

#[test]
fn test_custom_namespace_table() {
    let table = NamespaceTable::from_json(
        r#"{"elements": [
            {"name": "cmi.location", "access": "read_write",
             "data_type": {"type": "cmi_string", "max_len": 1000}},
            {"name": "cmi.completion_status", "access": "read_write",
             "data_type": {"type": "vocabulary",
                           "values": ["completed", "incomplete", "not attempted", "unknown"]},
             "default": "unknown"},
            {"name": "cmi.score.scaled", "access": "read_write",
             "data_type": {"type": "decimal", "min": -1.0, "max": 1.0}}
        ]}"#,
    )
    .unwrap();

    let mut api = RuntimeAdapter::builder(MemoryStore::new())
        .namespace(table)
        .config(AdapterConfig::new().with_version(ScormVersion::Scorm2004))
        .finish();

    assert_eq!(api.api_object_name(), "API_1484_11");
    assert_eq!(api.dispatch("Initialize", &[""]), "true");
    assert_eq!(api.dispatch("GetValue", &["cmi.completion_status"]), "unknown");
    assert_eq!(api.dispatch("SetValue", &["cmi.score.scaled", "1.5"]), "false");
    assert_eq!(api.dispatch("GetLastError", &[]), "407");
    assert_eq!(api.dispatch("GetValue", &["cmi.core.lesson_status"]), "");
    assert_eq!(api.dispatch("GetLastError", &[]), "401");
}
