use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        extension::ClientId,
        response::Response,
    },
};
use log::debug;
use mailtest_lib_shared::TransportDescriptor;

use crate::SendError;

/// Anything that can deliver a message and report the server's answer.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: Message) -> Result<String, SendError>;
}

#[async_trait]
impl MailTransport for AsyncSmtpTransport<Tokio1Executor> {
    async fn send(&self, message: Message) -> Result<String, SendError> {
        let response = AsyncTransport::send(self, message).await?;
        Ok(format_response(&response))
    }
}

fn tls(descriptor: &TransportDescriptor) -> Result<Tls, SendError> {
    let parameters = TlsParameters::new(descriptor.host.clone())?;
    if descriptor.implicit_tls {
        Ok(Tls::Wrapper(parameters))
    } else if descriptor.require_tls {
        Ok(Tls::Required(parameters))
    } else {
        Ok(Tls::Opportunistic(parameters))
    }
}

pub fn build_transport(
    descriptor: &TransportDescriptor,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, SendError> {
    debug!("Building SMTP transport {:?}", descriptor);

    let mut builder =
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(descriptor.host.as_str())
            .port(descriptor.port)
            .tls(tls(descriptor)?)
            .hello_name(ClientId::Domain(descriptor.name.clone()))
            .credentials(Credentials::new(
                descriptor.login.clone(),
                descriptor.password.clone(),
            ));

    // Leave lettre's own default alone unless one was configured
    if let Some(timeout) = descriptor.timeout {
        builder = builder.timeout(Some(timeout));
    }

    Ok(builder.build())
}

/// Renders a reply the way servers print it, e.g. `250 2.0.0 OK queued`.
pub fn format_response(response: &Response) -> String {
    let lines: Vec<&str> = response.message().collect();
    if lines.is_empty() {
        return response.code().to_string();
    }
    format!("{} {}", response.code(), lines.join(" "))
}
