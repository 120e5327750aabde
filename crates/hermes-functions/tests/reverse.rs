//! Behaviour of the string reverser.

use hermes_core::logging::NullSink;
use hermes_core::{Context, FailureKind, Function, InvocationEvent, Level};
use hermes_functions::ReverseFunction;
use hermes_test::{CaptureSink, TestClient};
use proptest::prelude::*;
use std::sync::Arc;

fn reverse(input: &str) -> String {
    let event = InvocationEvent::new(input.to_string());
    let context = Context::builder(event.id()).sink(Arc::new(NullSink)).build();
    ReverseFunction.apply(event, &context).unwrap()
}

#[test]
fn reverses_hello() {
    TestClient::new(ReverseFunction)
        .invoke("hello".to_string())
        .assert_output(&"olleh".to_string())
        .assert_logged(Level::Info, "logging info 1");
}

#[test]
fn empty_input_gives_empty_output() {
    TestClient::new(ReverseFunction)
        .invoke(String::new())
        .assert_output(&String::new());
}

#[test]
fn reverses_json_payload() {
    let outcome = TestClient::new(ReverseFunction).invoke_json(br#""hello world""#);
    let output: String = outcome.json().unwrap();
    assert_eq!(output, "dlrow olleh");
}

#[test]
fn non_string_payload_is_a_serialization_failure() {
    let outcome = TestClient::new(ReverseFunction).invoke_json(br#"{"text": "hi"}"#);
    assert_eq!(outcome.error().map(|f| f.kind), Some(FailureKind::Serialization));
}

#[test]
fn one_instance_serves_concurrent_calls() {
    let function = ReverseFunction;
    let inputs: Vec<String> = (0..16).map(|i| format!("input-{i}")).collect();

    std::thread::scope(|scope| {
        for input in &inputs {
            let function = &function;
            scope.spawn(move || {
                let output = function
                    .apply(InvocationEvent::new(input.clone()), &Context::mock())
                    .unwrap();
                assert_eq!(output, input.chars().rev().collect::<String>());
            });
        }
    });
}

proptest! {
    #[test]
    fn reversing_twice_is_identity(s in ".*") {
        prop_assert_eq!(reverse(&reverse(&s)), s);
    }

    #[test]
    fn reversal_preserves_length(s in ".*") {
        let out = reverse(&s);
        prop_assert_eq!(out.chars().count(), s.chars().count());
        prop_assert_eq!(out.len(), s.len());
    }

    #[test]
    fn logging_does_not_change_output(s in "\\PC{0,32}") {
        let captured = TestClient::new(ReverseFunction).invoke(s.clone()).into_output().unwrap();
        let failing = TestClient::new(ReverseFunction)
            .with_sink(CaptureSink::failing())
            .invoke(s.clone())
            .into_output()
            .unwrap();
        prop_assert_eq!(&captured, &reverse(&s));
        prop_assert_eq!(captured, failing);
    }
}
