use log::{debug, error, info};
use mailtest_component_configurator::Configuration;
use thiserror::Error;

pub use crate::message::{RUN_ID_ENV, TestMessage, body, run_id, run_id_from_env, subject};
pub use crate::transport::{MailTransport, build_transport, format_response};

pub mod logging;
mod message;
mod transport;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid mailbox '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("message could not be built: {0}")]
    Message(#[from] lettre::error::Error),
    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// How a run ended. Only ever reported, never turned into an exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ConfigAbsent,
    Sent(String),
    SendFailed(String),
}

/// Sends the test message once through `transport` and logs the result.
pub async fn send_test_message<T: MailTransport>(
    transport: &T,
    config: &Configuration,
    run_id: &str,
) -> Outcome {
    let result = match TestMessage::new(config, run_id).to_message() {
        Ok(message) => transport.send(message).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => {
            info!("Email sent: {response}");
            Outcome::Sent(response)
        }
        Err(e) => {
            error!("Email failed: {e}");
            Outcome::SendFailed(e.to_string())
        }
    }
}

pub async fn run(config: Option<Configuration>, run_id: &str) -> Outcome {
    let Some(config) = config else {
        debug!("No configuration, skipping send");
        return Outcome::ConfigAbsent;
    };

    info!(
        "SMTP: Sending to {}:{} as {} (Run {})",
        config.smtp.host,
        config.smtp.port,
        config.hostname(),
        run_id
    );

    match build_transport(&config.transport_descriptor()) {
        Ok(transport) => send_test_message(&transport, &config, run_id).await,
        Err(e) => {
            error!("Email failed: {e}");
            Outcome::SendFailed(e.to_string())
        }
    }
}
