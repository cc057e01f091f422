use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, error, info};
use mailtest_lib_shared::TransportDescriptor;
use serde::{Deserialize, Deserializer, de};
use thiserror::Error;

/// Where the config lives relative to the directory the tool is started from.
pub const DEFAULT_CONFIG_PATH: &str = "../../.env";

/// Overrides [`DEFAULT_CONFIG_PATH`] when set.
pub const CONFIG_PATH_ENV: &str = "MAIL_TEST_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config File {path:?}: read file failed with Error: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse failed with Error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("field '{field}' {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Configuration {
    pub component: String,
    pub smtp: SmtpConfiguration,
}

#[derive(Deserialize, Clone, PartialEq)]
pub struct SmtpConfiguration {
    pub host: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub login: String,
    pub password: String,
    pub email_address: String,

    pub full_name: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Configuration {
    pub fn parse_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Starting Configuration Load from file {}", path.display());
        let file = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        return Self::parse_from_string(file.as_str());
    }

    pub fn parse_from_string(string: &str) -> Result<Self, ConfigError> {
        debug!("Starting Configuration Load from string");
        let config = serde_yaml::from_str::<Self>(string)?;
        config.validate()?;
        return Ok(config);
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("component", &self.component),
            ("smtp.host", &self.smtp.host),
            ("smtp.login", &self.smtp.login),
            ("smtp.email_address", &self.smtp.email_address),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty",
                });
            }
        }

        if self.smtp.port == 0 {
            return Err(ConfigError::Invalid {
                field: "smtp.port",
                reason: "must not be 0",
            });
        }

        Ok(())
    }

    /// Name the client announces to the server.
    pub fn hostname(&self) -> String {
        format!("{}.local", self.component)
    }

    pub fn transport_descriptor(&self) -> TransportDescriptor {
        TransportDescriptor {
            name: self.hostname(),
            host: self.smtp.host.clone(),
            port: self.smtp.port,
            implicit_tls: false,
            require_tls: true,
            login: self.smtp.login.clone(),
            password: self.smtp.password.clone(),
            timeout: self.smtp.timeout_secs.map(Duration::from_secs),
        }
    }
}

impl fmt::Debug for SmtpConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfiguration")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("email_address", &self.email_address)
            .field("full_name", &self.full_name)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// The port shows up both as a number and as a quoted string in existing config files
#[derive(Deserialize)]
#[serde(untagged)]
enum Port {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text
            .trim()
            .parse::<u16>()
            .map_err(|e| de::Error::custom(format!("invalid port '{text}': {e}"))),
    }
}

pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Loads the config, logging why it could not be used. `None` means there is nothing to send with.
pub fn load_configuration(path: impl AsRef<Path>) -> Option<Configuration> {
    let path = path.as_ref();
    match Configuration::parse_from_file(path) {
        Ok(config) => {
            info!("Loaded config file {}", path.display());
            debug!("Configuration: {:?}", config);
            Some(config)
        }
        Err(e) => {
            error!("Config Load failed: {e}");
            None
        }
    }
}
