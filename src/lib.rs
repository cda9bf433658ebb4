//! amqp-send - single-message AMQP publisher
//!
//! Publishes exactly one message per invocation, either to a queue (declared on the
//! way, through the default exchange) or to an existing exchange with a routing key.
//!
//! # Overview
//!
//! - [`publisher`] - request validation and the connect, publish, release procedure
//! - [`transport`] - the [`Transport`](transport::Transport) seam and its lapin-backed client
//! - [`config`] - optional TOML file with connection defaults
//! - [`observability`] - tracing setup
//! - [`testing`] - a recording mock transport
//!
//! # Quick Start
//!
//! ```rust
//! use amqp_send::publisher::{send_message, PublishRequest};
//! use amqp_send::testing::{MockTransport, TransportCall};
//!
//! # tokio_test::block_on(async {
//! let request = PublishRequest::new("queue", Some("orders"), Some("orders"), Some("hello"))?;
//! let mut transport = MockTransport::new();
//!
//! let delivery = send_message(&mut transport, &request).await?;
//! assert_eq!(delivery.to_string(), "Sent hello to orders queue");
//! assert_eq!(
//!     transport.get_calls().await[1],
//!     TransportCall::DeclareQueue("orders".to_string())
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod publisher;
pub mod testing;
pub mod transport;

pub use config::{ConfigError, PublisherConfig};
pub use error::{PublisherError, PublisherResult};
pub use publisher::{
    run, send_message, ConnectionSpec, Delivery, DestinationType, PublishArgs, PublishRequest,
    Rejection,
};
pub use transport::amqp::{AmqpClient, AmqpError, PublishOptions};
pub use transport::Transport;
