//! The publish procedure: validate, connect, route to queue or exchange, release

use super::model::{DestinationType, PublishArgs, PublishRequest};
use crate::error::{PublisherError, PublisherResult};
use crate::publish_span;
use crate::transport::Transport;
use std::fmt;
use tracing::{debug, info, warn, Instrument};

/// Printed before anything else on every invocation
pub const WARNING_BANNER: [&str; 2] = [
    "Warning! Publishing to a queue that does not exist will create it.",
    "Publishing to an exchange that does not exist will NOT create it.",
];

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub destination_type: DestinationType,
    pub destination_name: String,
    pub message: String,
}

impl From<&PublishRequest> for Delivery {
    fn from(request: &PublishRequest) -> Self {
        Self {
            destination_type: request.destination_type(),
            destination_name: request.destination_name().to_string(),
            message: request.body().to_string(),
        }
    }
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sent {} to {} {}",
            self.message, self.destination_name, self.destination_type
        )
    }
}

/// Validate raw arguments and publish them
///
/// A rejected request returns before the transport is touched.
pub async fn run<T: Transport>(transport: &mut T, args: &PublishArgs) -> PublisherResult<Delivery> {
    let request = args.validate()?;
    send_message(transport, &request).await
}

/// Publish one message over `transport`
///
/// Once `connect` succeeds the transport is disconnected on every path, including
/// declare and publish failures.
pub async fn send_message<T: Transport>(
    transport: &mut T,
    request: &PublishRequest,
) -> PublisherResult<Delivery> {
    let span = publish_span!(
        destination = %request.destination_name(),
        kind = %request.destination_type(),
        routing_key = %request.routing_key()
    );

    async move {
        transport
            .connect()
            .await
            .map_err(PublisherError::connection_failed)?;
        debug!("Broker connection open");

        let result = deliver(&*transport, request).await;

        if let Err(e) = transport.disconnect().await {
            warn!(error = %e, "Failed to close broker connection cleanly");
        }

        result
    }
    .instrument(span)
    .await
}

async fn deliver<T: Transport>(
    transport: &T,
    request: &PublishRequest,
) -> PublisherResult<Delivery> {
    let name = request.destination_name();

    if request.destination_type() == DestinationType::Queue {
        transport
            .declare_queue(name)
            .await
            .map_err(|e| PublisherError::declare_failed(name, e))?;
        debug!(queue = %name, "Queue declared");
    }

    transport
        .publish(
            request.exchange(),
            request.routing_key(),
            request.body().as_bytes(),
        )
        .await
        .map_err(|e| {
            PublisherError::publish_failed(format!("{} '{}'", request.destination_type(), name), e)
        })?;

    info!(bytes = request.body().len(), "Message published");
    Ok(Delivery::from(request))
}
