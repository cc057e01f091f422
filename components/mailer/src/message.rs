use lettre::{
    Address, Message,
    message::{Mailbox, header::ContentType},
};
use log::debug;
use mailtest_component_configurator::Configuration;
use mailtest_lib_shared::UNSET_PLACEHOLDER;

use crate::SendError;

/// CI variable used to correlate the mail with the workflow run that sent it.
pub const RUN_ID_ENV: &str = "GITHUB_RUN_ID";

pub fn run_id(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNSET_PLACEHOLDER.to_string())
}

pub fn run_id_from_env() -> String {
    run_id(std::env::var(RUN_ID_ENV).ok())
}

pub fn subject(component: &str, run_id: &str) -> String {
    format!("[Mail Test - {component}] Node Email Test ({run_id})")
}

pub fn body(component: &str, run_id: &str) -> String {
    format!(
        "Mail Test ({run_id}) - {component}\n=============================\n\nmy Node test email message"
    )
}

/// The one message a run sends, addressed from the configured mailbox to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMessage {
    pub from: String,
    pub to: String,
    pub full_name: Option<String>,
    pub subject: String,
    pub body: String,
}

impl TestMessage {
    pub fn new(config: &Configuration, run_id: &str) -> Self {
        let address = config.smtp.email_address.clone();
        Self {
            from: address.clone(),
            to: address,
            full_name: config.smtp.full_name.clone(),
            subject: subject(&config.component, run_id),
            body: body(&config.component, run_id),
        }
    }

    fn mailbox(&self, address: &str) -> Result<Mailbox, SendError> {
        let parsed = address
            .trim()
            .parse::<Address>()
            .map_err(|source| SendError::Address {
                address: address.to_string(),
                source,
            })?;
        Ok(Mailbox::new(self.full_name.clone(), parsed))
    }

    pub fn to_message(&self) -> Result<Message, SendError> {
        debug!("Building message '{}' for {}", self.subject, self.to);
        let message = Message::builder()
            .from(self.mailbox(&self.from)?)
            .to(self.mailbox(&self.to)?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(address: &str) -> Configuration {
        Configuration::parse_from_string(&format!(
            r#"
component: ci-runner
smtp:
  host: smtp.example.com
  port: 587
  login: ci
  password: secret
  email_address: '{address}'
  full_name: CI Runner
"#
        ))
        .unwrap()
    }

    #[test]
    fn subject_and_body_follow_the_template() {
        assert_eq!(
            subject("ci-runner", "4242"),
            "[Mail Test - ci-runner] Node Email Test (4242)"
        );
        assert_eq!(
            body("ci-runner", "4242"),
            "Mail Test (4242) - ci-runner\n=============================\n\nmy Node test email message"
        );
    }

    #[test]
    fn unset_run_id_uses_placeholder() {
        let run_id = run_id(None);
        assert_eq!(run_id, "undefined");
        assert_eq!(
            subject("ci-runner", &run_id),
            "[Mail Test - ci-runner] Node Email Test (undefined)"
        );
        assert!(body("ci-runner", &run_id).starts_with("Mail Test (undefined) - ci-runner\n"));
    }

    #[test]
    fn set_run_id_is_kept_verbatim() {
        assert_eq!(run_id(Some(" 17 ".to_string())), " 17 ");
    }

    #[test]
    fn sender_is_recipient() {
        let message = TestMessage::new(&config("ci@example.com"), "1");

        assert_eq!(message.from, "ci@example.com");
        assert_eq!(message.to, message.from);
        assert_eq!(message.full_name.as_deref(), Some("CI Runner"));
    }

    #[test]
    fn message_envelope_is_addressed_to_itself() {
        let message = TestMessage::new(&config("ci@example.com"), "1")
            .to_message()
            .unwrap();
        let envelope = message.envelope();
        let address: Address = "ci@example.com".parse().unwrap();

        assert_eq!(envelope.from(), Some(&address));
        assert_eq!(envelope.to(), &[address]);

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: [Mail Test - ci-runner] Node Email Test (1)"));
    }

    #[test]
    fn bad_address_is_a_send_error() {
        let err = TestMessage::new(&config("not an address"), "1")
            .to_message()
            .unwrap_err();
        assert!(matches!(err, SendError::Address { .. }));
        assert!(err.to_string().contains("not an address"));
    }
}
