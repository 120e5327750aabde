//! End-to-end scenarios through the test client.

use hermes_core::{
    Context, ExecutionError, FailureKind, Function, InvocationEvent, Level, Organization,
};
use hermes_test::{CaptureSink, TestClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize, Serialize)]
struct Order {
    items: Vec<String>,
}

#[derive(Debug, PartialEq, Deserialize, Serialize)]
struct Receipt {
    count: usize,
}

struct CountItems;

impl Function<Order, Receipt> for CountItems {
    fn apply(
        &self,
        event: InvocationEvent<Order>,
        context: &Context,
    ) -> Result<Receipt, ExecutionError> {
        let logger = context.logger();
        logger.info("M1");
        logger.info("M2");
        logger.info("M3");

        let order = event.into_data();
        if order.items.is_empty() {
            logger.error("order has no items");
            return Err(ExecutionError::invalid_input("order has no items"));
        }
        Ok(Receipt {
            count: order.items.len(),
        })
    }
}

struct Unreliable;

impl Function<String, String> for Unreliable {
    fn apply(
        &self,
        _event: InvocationEvent<String>,
        context: &Context,
    ) -> Result<String, ExecutionError> {
        context.logger().warn("about to fail");
        let cause = anyhow::anyhow!("connection reset");
        Err(ExecutionError::failed_with_source("downstream unavailable", cause))
    }
}

#[test]
fn records_keep_issue_order() {
    let client = TestClient::new(CountItems);
    let outcome = client.invoke(Order {
        items: vec!["apple".to_string()],
    });

    outcome
        .assert_output(&Receipt { count: 1 })
        .assert_messages(&["M1", "M2", "M3"]);
}

#[test]
fn failing_function_has_no_output() {
    let client = TestClient::new(CountItems);
    let outcome = client.invoke(Order { items: Vec::new() });

    outcome
        .assert_failure()
        .assert_error_contains("order has no items")
        .assert_logged(Level::Error, "order has no items");
    assert!(outcome.output().is_none());
    assert!(matches!(
        outcome.error(),
        Some(ExecutionError::InvalidInput { .. })
    ));
}

#[test]
fn execution_failure_through_json_dispatch() {
    let client = TestClient::new(Unreliable);
    let outcome = client.invoke_json(br#""ping""#);

    let failure = outcome.error().expect("dispatch should fail");
    assert_eq!(failure.kind, FailureKind::Execution);
    assert_eq!(failure.code, "FUNCTION_ERROR");
    assert!(failure.message.contains("downstream unavailable"));
    outcome.assert_logged(Level::Warn, "about to fail");
}

#[test]
fn serialization_failure_is_distinct_from_execution_failure() {
    let client = TestClient::new(CountItems);
    let outcome = client.invoke_json(br#"{"items": "not a list"}"#);

    let failure = outcome.error().expect("decode should fail");
    assert_eq!(failure.kind, FailureKind::Serialization);
    assert_eq!(failure.code, "INPUT_DECODE_ERROR");
    assert!(outcome.records().is_empty());
}

#[test]
fn json_dispatch_round_trip() {
    let client = TestClient::new(CountItems);
    let outcome = client
        .invoke_value(&Order {
            items: vec!["a".to_string(), "b".to_string()],
        })
        .unwrap();

    let receipt: Receipt = outcome.json().unwrap();
    assert_eq!(receipt, Receipt { count: 2 });
}

#[test]
fn logging_never_alters_output() {
    let capturing = TestClient::new(CountItems);
    let failing = TestClient::new(CountItems).with_sink(CaptureSink::failing());
    let order = || Order {
        items: vec!["x".to_string(), "y".to_string(), "z".to_string()],
    };

    let captured = capturing.invoke(order()).into_output().unwrap();
    let dropped = failing.invoke(order()).into_output().unwrap();

    assert_eq!(captured, dropped);
    assert!(failing.sink().is_empty());
    assert_eq!(capturing.sink().len(), 3);
}

#[test]
fn organization_reaches_the_function() {
    struct WhoAmI;

    impl Function<(), String> for WhoAmI {
        fn apply(
            &self,
            _event: InvocationEvent<()>,
            context: &Context,
        ) -> Result<String, ExecutionError> {
            context
                .organization()
                .map(|org| org.id().to_string())
                .ok_or_else(|| ExecutionError::invalid_input("no organization"))
        }
    }

    let anonymous = TestClient::new(WhoAmI);
    anonymous.invoke(()).assert_error_contains("no organization");

    let client = TestClient::new(WhoAmI).with_organization(
        Organization::new("00Dxx0000001gPL").with_user_id("005xx000001X8Uz"),
    );
    client.invoke(()).assert_output(&"00Dxx0000001gPL".to_string());
}

#[test]
fn concurrent_invocations_share_one_sink() {
    const THREADS: usize = 8;
    const RECORDS: usize = 200;

    let sink = CaptureSink::new();
    let ids = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let sink = sink.clone();
                scope.spawn(move || {
                    let event = InvocationEvent::new(());
                    let context = Context::builder(event.id()).sink(Arc::new(sink)).build();
                    for n in 0..RECORDS {
                        context.logger().info(n.to_string());
                    }
                    assert_eq!(context.logger().dropped_records(), 0);
                    context.invocation_id()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("logging thread panicked"))
            .collect::<Vec<_>>()
    });

    assert_eq!(sink.len(), THREADS * RECORDS);
    for id in ids {
        let records = sink.records_for(id);
        let expected: Vec<String> = (0..RECORDS).map(|n| n.to_string()).collect();
        let actual: Vec<String> = records.iter().map(|r| r.message.clone()).collect();

        assert_eq!(actual, expected);
        assert!(records.iter().all(|r| r.invocation_id == id));
        assert!(records.iter().all(|r| r.level() == Some(Level::Info)));
    }
}
