//! Command-line interface
//!
//! Flags mirror the classic RabbitMQ sender scripts: short options for every
//! connection and message parameter, and `--type` defaulting to `queue`.

use crate::config::{ConfigError, PublisherConfig};
use crate::publisher::{ConnectionSpec, PublishArgs};
use crate::transport::amqp::PublishOptions;
use clap::Parser;
use std::path::PathBuf;

/// Publish a single message to an AMQP queue or exchange
#[derive(Parser, Debug, Clone)]
#[command(name = "amqp-send")]
#[command(about = "Publish a single message to an AMQP queue or exchange")]
#[command(
    long_about = "Publish a single message to an AMQP queue or exchange.\n\
                  Queues are declared (created if missing) before publishing; exchanges are never created."
)]
#[command(version)]
pub struct Cli {
    /// Broker instance IP or host
    #[arg(short = 'i', long, value_name = "HOST")]
    pub instance: Option<String>,

    /// Broker port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// User login for broker auth
    #[arg(short, long)]
    pub user: Option<String>,

    /// User password for broker auth
    #[arg(short, long, env = "AMQP_PASSWORD", hide_env_values = true)]
    pub secret: Option<String>,

    /// Virtual host
    #[arg(short, long)]
    pub vhost: Option<String>,

    /// Routing key
    #[arg(
        short,
        long = "routing_key",
        visible_alias = "routing-key",
        value_name = "KEY"
    )]
    pub routing_key: Option<String>,

    /// Destination type: queue or exchange
    #[arg(short = 't', long = "type", default_value = "queue", value_name = "TYPE")]
    pub destination_type: String,

    /// Exchange or queue name
    #[arg(short, long, value_name = "NAME")]
    pub object: Option<String>,

    /// Message body
    #[arg(short, long)]
    pub message: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Wait for the broker to confirm the publish
    #[arg(long)]
    pub confirm: bool,

    /// Publish with persistent delivery mode
    #[arg(long)]
    pub persistent: bool,

    /// Verbose logging
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Raw publish arguments, not yet validated
    pub fn publish_args(&self) -> PublishArgs {
        PublishArgs {
            destination_type: self.destination_type.clone(),
            destination_name: self.object.clone(),
            routing_key: self.routing_key.clone(),
            body: self.message.clone(),
        }
    }

    /// Connection parameters with flags taking precedence over the config file
    pub fn connection_spec(
        &self,
        config: Option<&PublisherConfig>,
    ) -> Result<ConnectionSpec, ConfigError> {
        let broker = config.map(|c| &c.broker);

        let password = match (&self.secret, config) {
            (Some(secret), _) => Some(secret.clone()),
            (None, Some(config)) => config.get_broker_password()?,
            (None, None) => None,
        };

        Ok(ConnectionSpec {
            host: self
                .instance
                .clone()
                .or_else(|| broker.and_then(|b| b.host.clone())),
            port: self.port.or_else(|| broker.and_then(|b| b.port)),
            virtual_host: self
                .vhost
                .clone()
                .or_else(|| broker.and_then(|b| b.vhost.clone())),
            username: self
                .user
                .clone()
                .or_else(|| broker.and_then(|b| b.username.clone())),
            password,
        })
    }

    /// Publish switches; a flag enables the option even if the config disables it
    pub fn publish_options(&self, config: Option<&PublisherConfig>) -> PublishOptions {
        let defaults = config.map(|c| c.publish.clone()).unwrap_or_default();

        PublishOptions {
            confirm: self.confirm || defaults.confirm,
            persistent: self.persistent || defaults.persistent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BrokerSection, PublishSection};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("amqp-send").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let cli = parse(&["-i", "flag-host", "-o", "orders", "-m", "hi", "-s", "pw"]);
        let config = PublisherConfig {
            broker: BrokerSection {
                host: Some("config-host".to_string()),
                port: Some(5673),
                vhost: Some("billing".to_string()),
                username: Some("publisher".to_string()),
                password_env: None,
            },
            publish: PublishSection {
                confirm: true,
                persistent: false,
            },
        };

        let spec = cli.connection_spec(Some(&config)).unwrap();
        assert_eq!(spec.host.as_deref(), Some("flag-host"));
        assert_eq!(spec.port, Some(5673));
        assert_eq!(spec.virtual_host.as_deref(), Some("billing"));
        assert_eq!(spec.username.as_deref(), Some("publisher"));

        let options = cli.publish_options(Some(&config));
        assert!(options.confirm);
        assert!(!options.persistent);
    }

    #[test]
    fn test_no_config_leaves_fields_unset() {
        let cli = parse(&["-o", "orders", "-m", "hi", "-s", "pw"]);
        let spec = cli.connection_spec(None).unwrap();

        assert_eq!(spec.host, None);
        assert_eq!(spec.port, None);
        assert_eq!(spec.password.as_deref(), Some("pw"));
        assert_eq!(cli.publish_options(None), PublishOptions::default());
    }
}
