//! Pure connection setup for the AMQP client
//!
//! Turns a [`ConnectionSpec`] into the URI, connection properties and message
//! properties that lapin expects. Nothing in here touches the network.

use crate::publisher::ConnectionSpec;
use lapin::uri::AMQPUri;
use lapin::{BasicProperties, ConnectionProperties};
use thiserror::Error;

/// AMQP reply code sent with a normal connection close
pub const REPLY_SUCCESS: u16 = 200;

/// AMQP delivery mode for messages that survive a broker restart
pub const DELIVERY_MODE_PERSISTENT: u8 = 2;

const CONNECTION_NAME: &str = concat!("amqp-send/", env!("CARGO_PKG_VERSION"));

/// Connection state for the AMQP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Nothing opened yet
    Idle,
    /// Connection and channel are open
    Connected,
    /// Connection was released
    Closed,
}

/// Per-publish behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// Enable publisher confirms and require an ack for the message
    pub confirm: bool,
    /// Publish with delivery mode 2
    pub persistent: bool,
}

/// AMQP transport errors
#[derive(Debug, Error)]
pub enum AmqpError {
    #[error("Connection to {endpoint} failed")]
    ConnectionFailed {
        endpoint: String,
        #[source]
        source: lapin::Error,
    },
    #[error("Opening a channel failed")]
    ChannelFailed(#[source] lapin::Error),
    #[error("Enabling publisher confirms failed")]
    ConfirmSelectFailed(#[source] lapin::Error),
    #[error("Queue declare failed")]
    DeclareFailed(#[source] lapin::Error),
    #[error("Publishing failed")]
    PublishFailed(#[source] lapin::Error),
    #[error("Broker did not acknowledge the message")]
    NotAcknowledged,
    #[error("Closing the connection failed")]
    CloseFailed(#[source] lapin::Error),
    #[error("Not connected - current state: {state:?}")]
    NotConnected { state: ConnectionState },
}

/// Build the AMQP URI, filling unset fields with the client defaults
pub fn build_amqp_uri(spec: &ConnectionSpec) -> AMQPUri {
    let mut uri = AMQPUri::default();

    if let Some(host) = &spec.host {
        uri.authority.host = host.clone();
    }
    if let Some(port) = spec.port {
        uri.authority.port = port;
    }
    if let Some(vhost) = &spec.virtual_host {
        uri.vhost = vhost.clone();
    }
    if let Some(username) = &spec.username {
        uri.authority.userinfo.username = username.clone();
    }
    if let Some(password) = &spec.password {
        uri.authority.userinfo.password = password.clone();
    }

    uri
}

/// Human-readable endpoint for logs and errors, never containing the password
pub fn describe_endpoint(uri: &AMQPUri) -> String {
    format!(
        "amqp://{}@{}:{}/{}",
        uri.authority.userinfo.username,
        uri.authority.host,
        uri.authority.port,
        uri.vhost.trim_start_matches('/')
    )
}

pub fn connection_properties() -> ConnectionProperties {
    ConnectionProperties::default().with_connection_name(CONNECTION_NAME.into())
}

/// Message properties for a publish under `options`
pub fn basic_properties(options: &PublishOptions) -> BasicProperties {
    let properties = BasicProperties::default();
    if options.persistent {
        properties.with_delivery_mode(DELIVERY_MODE_PERSISTENT)
    } else {
        properties
    }
}
