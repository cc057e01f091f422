use std::time::Duration;

/// Text embedded in place of an environment variable that is not set.
pub const UNSET_PLACEHOLDER: &str = "undefined";

/// Log filter used when `RUST_LOG` is not set. Keeps the SMTP conversation visible.
pub const DEFAULT_LOG_FILTER: &str = "info,lettre=debug";

/// Everything needed to open an authenticated submission session.
#[derive(Clone, PartialEq, Eq)]
pub struct TransportDescriptor {
    /// Name announced in EHLO
    pub name: String,
    pub host: String,
    pub port: u16,
    pub implicit_tls: bool,
    /// Fail unless the plaintext session can be upgraded with STARTTLS
    pub require_tls: bool,
    pub login: String,
    pub password: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for TransportDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportDescriptor")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("implicit_tls", &self.implicit_tls)
            .field("require_tls", &self.require_tls)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_debug_hides_password() {
        let descriptor = TransportDescriptor {
            name: "ci.local".to_string(),
            host: "smtp.example.com".to_string(),
            port: 587,
            implicit_tls: false,
            require_tls: true,
            login: "ci@example.com".to_string(),
            password: "hunter2".to_string(),
            timeout: None,
        };

        let printed = format!("{:?}", descriptor);
        assert!(printed.contains("smtp.example.com"));
        assert!(!printed.contains("hunter2"));
    }
}
