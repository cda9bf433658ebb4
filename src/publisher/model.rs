//! Request-scoped data: where to connect and what to publish

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Broker connection parameters
///
/// Every field is optional. A missing value falls back to the AMQP client default
/// (`localhost`, `5672`, `/`, `guest`, `guest`).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub virtual_host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for ConnectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSpec")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("virtual_host", &self.virtual_host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Kind of destination a message is published to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationType {
    Queue,
    Exchange,
}

impl DestinationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationType::Queue => "queue",
            DestinationType::Exchange => "exchange",
        }
    }
}

impl fmt::Display for DestinationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DestinationType {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queue" => Ok(DestinationType::Queue),
            "exchange" => Ok(DestinationType::Exchange),
            other => Err(Rejection::UnknownDestinationType(other.to_string())),
        }
    }
}

/// Why a publish request was refused before touching the broker
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unknown destination type '{0}', expected 'queue' or 'exchange'")]
    UnknownDestinationType(String),
    #[error("destination name is missing")]
    MissingDestination,
    #[error("message is empty")]
    EmptyMessage,
}

/// Unvalidated publish arguments as they arrive from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishArgs {
    pub destination_type: String,
    pub destination_name: Option<String>,
    pub routing_key: Option<String>,
    pub body: Option<String>,
}

impl Default for PublishArgs {
    fn default() -> Self {
        Self {
            destination_type: DestinationType::Queue.as_str().to_string(),
            destination_name: None,
            routing_key: None,
            body: None,
        }
    }
}

impl PublishArgs {
    pub fn validate(&self) -> Result<PublishRequest, Rejection> {
        PublishRequest::new(
            &self.destination_type,
            self.destination_name.as_deref(),
            self.routing_key.as_deref(),
            self.body.as_deref(),
        )
    }
}

/// A validated, immutable request to publish one message
///
/// The destination name and body are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    destination_type: DestinationType,
    destination_name: String,
    routing_key: String,
    body: String,
}

impl PublishRequest {
    /// Validate raw inputs into a request
    ///
    /// A missing routing key becomes the empty string.
    pub fn new(
        destination_type: &str,
        destination_name: Option<&str>,
        routing_key: Option<&str>,
        body: Option<&str>,
    ) -> Result<Self, Rejection> {
        let destination_type = destination_type.parse::<DestinationType>()?;

        let destination_name = match destination_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(Rejection::MissingDestination),
        };

        let body = match body {
            Some(body) if !body.is_empty() => body.to_string(),
            _ => return Err(Rejection::EmptyMessage),
        };

        Ok(Self {
            destination_type,
            destination_name,
            routing_key: routing_key.unwrap_or_default().to_string(),
            body,
        })
    }

    pub fn destination_type(&self) -> DestinationType {
        self.destination_type
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Exchange the message is handed to: the named exchange, or the default
    /// exchange (`""`) for queue destinations
    pub fn exchange(&self) -> &str {
        match self.destination_type {
            DestinationType::Queue => "",
            DestinationType::Exchange => &self.destination_name,
        }
    }
}
