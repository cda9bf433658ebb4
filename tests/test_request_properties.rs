//! Property tests for request validation and destination routing
//!
//! For arbitrary names, routing keys and bodies, the broker operations issued
//! depend only on the destination type, and invalid requests never reach the broker.

use amqp_send::publisher::{run, PublishArgs};
use amqp_send::testing::{MockTransport, TransportCall};
use amqp_send::PublisherError;
use proptest::prelude::*;

fn non_empty() -> impl Strategy<Value = String> {
    ".{1,32}"
}

fn any_text() -> impl Strategy<Value = String> {
    ".{0,32}"
}

fn run_blocking(args: &PublishArgs) -> (Result<String, PublisherError>, Vec<TransportCall>) {
    tokio_test::block_on(async {
        let mut transport = MockTransport::new();
        let result = run(&mut transport, args).await.map(|d| d.to_string());
        (result, transport.get_calls().await)
    })
}

proptest! {
    #[test]
    fn queue_requests_declare_then_publish_to_default_exchange(
        name in non_empty(),
        routing_key in any_text(),
        body in non_empty(),
    ) {
        let args = PublishArgs {
            destination_type: "queue".to_string(),
            destination_name: Some(name.clone()),
            routing_key: Some(routing_key.clone()),
            body: Some(body.clone()),
        };

        let (result, calls) = run_blocking(&args);

        prop_assert_eq!(result.unwrap(), format!("Sent {body} to {name} queue"));
        prop_assert_eq!(calls, vec![
            TransportCall::Connect,
            TransportCall::DeclareQueue(name),
            TransportCall::Publish {
                exchange: String::new(),
                routing_key,
                payload: body.into_bytes(),
            },
            TransportCall::Disconnect,
        ]);
    }

    #[test]
    fn exchange_requests_never_declare(
        name in non_empty(),
        routing_key in any_text(),
        body in non_empty(),
    ) {
        let args = PublishArgs {
            destination_type: "exchange".to_string(),
            destination_name: Some(name.clone()),
            routing_key: Some(routing_key.clone()),
            body: Some(body.clone()),
        };

        let (result, calls) = run_blocking(&args);

        prop_assert_eq!(result.unwrap(), format!("Sent {body} to {name} exchange"));
        prop_assert_eq!(calls, vec![
            TransportCall::Connect,
            TransportCall::Publish {
                exchange: name,
                routing_key,
                payload: body.into_bytes(),
            },
            TransportCall::Disconnect,
        ]);
    }

    #[test]
    fn invalid_requests_touch_nothing(
        kind in prop_oneof![
            Just("queue".to_string()),
            Just("exchange".to_string()),
            "[a-z]{1,10}",
        ],
        name in proptest::option::of(any_text()),
        body in proptest::option::of(any_text()),
    ) {
        let type_ok = kind == "queue" || kind == "exchange";
        let name_ok = name.as_deref().is_some_and(|n| !n.is_empty());
        let body_ok = body.as_deref().is_some_and(|b| !b.is_empty());
        prop_assume!(!(type_ok && name_ok && body_ok));

        let args = PublishArgs {
            destination_type: kind,
            destination_name: name,
            routing_key: None,
            body,
        };

        let (result, calls) = run_blocking(&args);

        let error = result.unwrap_err();
        prop_assert!(matches!(error, PublisherError::Rejected(_)));
        prop_assert_eq!(error.exit_code(), 1);
        prop_assert!(calls.is_empty());
    }
}
