//! amqp-send - publish a single message to an AMQP queue or exchange
//!
//! ```bash
//! # Declare "orders" if needed and publish through the default exchange
//! amqp-send -i localhost -p 5672 -u guest -s guest -v / \
//!   --type queue --object orders --routing_key orders --message "hello"
//!
//! # Publish to an existing exchange, never creating it
//! amqp-send --type exchange --object events --routing_key "" --message "ping"
//! ```

use amqp_send::cli::Cli;
use amqp_send::config::{locate_config_file, ConfigError, PublisherConfig};
use amqp_send::observability::init_default_logging;
use amqp_send::publisher::{send_message, Delivery, WARNING_BANNER};
use amqp_send::transport::amqp::AmqpClient;
use amqp_send::PublisherError;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> ExitCode {
    for line in WARNING_BANNER {
        println!("{line}");
    }

    let cli = Cli::parse();

    init_default_logging(cli.verbose);

    info!("Starting amqp-send v{}", env!("CARGO_PKG_VERSION"));

    match publish(&cli).await {
        Ok(delivery) => {
            println!(" [+] {delivery}");
            ExitCode::SUCCESS
        }
        Err(e @ PublisherError::Rejected(_)) => {
            println!("{e}");
            ExitCode::from(e.exit_code())
        }
        Err(e) => {
            debug!(error = ?e, "Publish failed");
            eprintln!("✗ {}", e.report());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn publish(cli: &Cli) -> Result<Delivery, PublisherError> {
    // Reject bad requests before reading config or opening a connection
    let request = cli.publish_args().validate()?;

    let config = load_configuration(cli.config.as_deref())?;
    let spec = cli.connection_spec(config.as_ref())?;
    let options = cli.publish_options(config.as_ref());

    let mut client = AmqpClient::new(spec, options);
    send_message(&mut client, &request).await
}

fn load_configuration(explicit: Option<&Path>) -> Result<Option<PublisherConfig>, ConfigError> {
    match locate_config_file(explicit) {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            PublisherConfig::load_from_file(&path).map(Some)
        }
        None => Ok(None),
    }
}
