//! Reference functions dispatched through a configured host.

use hermes::functions::{DebugLogsFunction, FunctionOutput, ReverseFunction};
use hermes::{ConfigLoader, FailureKind, JsonFunction, Level, LocalHost};
use hermes_test::CaptureSink;
use std::sync::Arc;

fn host(sink: &CaptureSink) -> LocalHost {
    let config = ConfigLoader::new()
        .with_string(
            r#"
            [function]
            name = "reverse"
            event_type = "com.example.reverse"

            [telemetry]
            service_name = "reverse-fn"
            "#,
            "toml",
        )
        .unwrap()
        .load()
        .unwrap();

    LocalHost::new(&config).with_sink(Arc::new(sink.clone()))
}

#[test]
fn reverse_through_host() {
    let sink = CaptureSink::new();
    let host = host(&sink);
    let function = host.instrument(JsonFunction::new(ReverseFunction));

    let output = host.invoke(&function, br#""hello""#).unwrap();
    assert_eq!(output, br#""olleh""#);
    assert_eq!(sink.leveled(Level::Info), vec!["logging info 1"]);
}

#[test]
fn reverse_empty_string() {
    let sink = CaptureSink::new();
    let host = host(&sink);

    let output: String = host
        .invoke_value(&JsonFunction::new(ReverseFunction), "")
        .unwrap();
    assert_eq!(output, "");
}

#[test]
fn debug_logs_through_host() {
    let sink = CaptureSink::new();
    let host = host(&sink);
    let function = JsonFunction::new(DebugLogsFunction);

    let output: FunctionOutput = host
        .invoke_value(&function, &serde_json::json!({}))
        .unwrap();

    assert!(output.accounts.is_empty());
    assert_eq!(sink.raw(), vec!["println works"]);
    assert_eq!(
        sink.leveled(Level::Info),
        vec!["logging info 1", "logging info 2", "logging info 3"]
    );
    assert_eq!(sink.leveled(Level::Debug), vec!["logging debug 1"]);
}

#[test]
fn host_rejects_wrong_payload_shape() {
    let sink = CaptureSink::new();
    let host = host(&sink);

    let failure = host
        .invoke(&JsonFunction::new(ReverseFunction), b"[1, 2, 3]")
        .unwrap_err();
    assert_eq!(failure.kind, FailureKind::Serialization);
    assert!(sink.is_empty());
}

#[test]
fn failing_sink_does_not_fail_the_host() {
    let sink = CaptureSink::failing();
    let host = host(&sink);
    let function = host.instrument(JsonFunction::new(DebugLogsFunction));

    let output = host.invoke(&function, b"{}").unwrap();
    assert_eq!(output, br#"{"accounts":[]}"#);
}
