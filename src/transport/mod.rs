//! Transport layer for broker communication
//!
//! The publish procedure only needs to open a connection, declare a queue, publish a
//! body and close again. [`Transport`] captures exactly that so the procedure can run
//! against the real AMQP client or a test double.

pub mod amqp;

pub use amqp::ConnectionState;

/// Broker operations needed to publish a single message
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open the connection and the channel used for publishing
    async fn connect(&mut self) -> Result<(), Self::Error>;

    /// Ensure a queue exists, creating it with default parameters if needed
    ///
    /// Declaring a queue that already exists is not an error.
    async fn declare_queue(&self, queue: &str) -> Result<(), Self::Error>;

    /// Publish `payload` to `exchange` with `routing_key`
    ///
    /// The empty exchange name addresses the broker's default exchange.
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> Result<(), Self::Error>;

    /// Release the connection
    async fn disconnect(&mut self) -> Result<(), Self::Error>;

    /// Check if transport is currently connected
    fn is_connected(&self) -> bool;

    /// Get current connection state
    fn connection_state(&self) -> ConnectionState;
}

/// Type alias for the AMQP transport
pub type AmqpTransport = amqp::AmqpClient;
