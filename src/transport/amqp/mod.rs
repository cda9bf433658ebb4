//! AMQP 0-9-1 transport built on lapin
//!
//! - [`connection`] - pure URI/property construction and error types
//! - [`client`] - the I/O side implementing [`Transport`](crate::transport::Transport)
//!
//! # Usage
//!
//! ```rust,no_run
//! use amqp_send::publisher::ConnectionSpec;
//! use amqp_send::transport::amqp::{AmqpClient, PublishOptions};
//! use amqp_send::transport::Transport;
//!
//! # tokio_test::block_on(async {
//! let spec = ConnectionSpec {
//!     host: Some("localhost".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut client = AmqpClient::new(spec, PublishOptions::default());
//! client.connect().await?;
//! client.declare_queue("orders").await?;
//! client.publish("", "orders", b"hello").await?;
//! client.disconnect().await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

pub mod client;
pub mod connection;

pub use client::AmqpClient;
pub use connection::{AmqpError, ConnectionState, PublishOptions};
