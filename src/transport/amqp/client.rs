//! Impure I/O operations for the AMQP client
//!
//! Wraps a lapin connection and a single channel behind the [`Transport`] trait.

use super::connection::{
    basic_properties, build_amqp_uri, connection_properties, describe_endpoint, AmqpError,
    ConnectionState, PublishOptions, REPLY_SUCCESS,
};
use crate::publisher::ConnectionSpec;
use crate::transport::Transport;
use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Channel, Connection};
use tracing::{debug, info, warn};

/// AMQP 0-9-1 transport backed by lapin
pub struct AmqpClient {
    spec: ConnectionSpec,
    options: PublishOptions,
    connection: Option<Connection>,
    channel: Option<Channel>,
    state: ConnectionState,
}

impl AmqpClient {
    /// Create a client; no network I/O happens until [`Transport::connect`]
    pub fn new(spec: ConnectionSpec, options: PublishOptions) -> Self {
        Self {
            spec,
            options,
            connection: None,
            channel: None,
            state: ConnectionState::Idle,
        }
    }

    pub fn options(&self) -> PublishOptions {
        self.options
    }

    fn channel(&self) -> Result<&Channel, AmqpError> {
        self.channel.as_ref().ok_or_else(|| AmqpError::NotConnected {
            state: self.state.clone(),
        })
    }

    async fn open_channel(&self, connection: &Connection) -> Result<Channel, AmqpError> {
        let channel = connection
            .create_channel()
            .await
            .map_err(AmqpError::ChannelFailed)?;

        if self.options.confirm {
            channel
                .confirm_select(ConfirmSelectOptions::default())
                .await
                .map_err(AmqpError::ConfirmSelectFailed)?;
            debug!("Publisher confirms enabled");
        }

        Ok(channel)
    }
}

#[async_trait]
impl Transport for AmqpClient {
    type Error = AmqpError;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        let uri = build_amqp_uri(&self.spec);
        let endpoint = describe_endpoint(&uri);
        info!(endpoint = %endpoint, "Connecting to broker");

        let connection = Connection::connect_uri(uri, connection_properties())
            .await
            .map_err(|source| AmqpError::ConnectionFailed {
                endpoint: endpoint.clone(),
                source,
            })?;

        let channel = match self.open_channel(&connection).await {
            Ok(channel) => channel,
            Err(e) => {
                // The socket is already up, release it before reporting
                let closed = connection.close(REPLY_SUCCESS, "channel setup failed").await;
                if let Err(close_err) = closed {
                    warn!(error = %close_err, "Failed to close connection after channel error");
                }
                return Err(e);
            }
        };

        self.connection = Some(connection);
        self.channel = Some(channel);
        self.state = ConnectionState::Connected;
        debug!(endpoint = %endpoint, "Connected");
        Ok(())
    }

    async fn declare_queue(&self, queue: &str) -> Result<(), Self::Error> {
        let declared = self
            .channel()?
            .queue_declare(queue, QueueDeclareOptions::default(), FieldTable::default())
            .await
            .map_err(AmqpError::DeclareFailed)?;

        debug!(
            queue = declared.name().as_str(),
            messages = declared.message_count(),
            consumers = declared.consumer_count(),
            "Queue ready"
        );
        Ok(())
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> Result<(), Self::Error> {
        let confirm = self
            .channel()?
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                payload,
                basic_properties(&self.options),
            )
            .await
            .map_err(AmqpError::PublishFailed)?;

        if self.options.confirm {
            let confirmation = confirm.await.map_err(AmqpError::PublishFailed)?;
            if !confirmation.is_ack() {
                return Err(AmqpError::NotAcknowledged);
            }
            debug!("Publish acknowledged by broker");
        }

        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        self.channel = None;
        let connection = self.connection.take();
        self.state = ConnectionState::Closed;

        if let Some(connection) = connection {
            connection
                .close(REPLY_SUCCESS, "OK")
                .await
                .map_err(AmqpError::CloseFailed)?;
            debug!("Connection closed");
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    fn connection_state(&self) -> ConnectionState {
        self.state.clone()
    }
}
