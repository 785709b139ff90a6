use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Deployment stage the portal is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "production" | "prod" => Self::Production,
            "ci" | "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything the binary needs to boot, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    /// Reads `JOBWORKS_*` variables, consulting `.env` first. Every setting
    /// has a development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(&env_or("JOBWORKS_ENV", "development"));

        let host = env_or("JOBWORKS_HOST", "127.0.0.1");
        let port = env_or("JOBWORKS_PORT", "8000")
            .parse::<u16>()
            .map_err(|_| ConfigError::Port)?;

        let log_level = env_or("JOBWORKS_LOG", "info");

        let from_address = env_or("JOBWORKS_MAIL_FROM", "noreply@jobworks.dev");
        if !from_address.contains('@') {
            return Err(ConfigError::Sender { value: from_address });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail: MailConfig { from_address },
        })
    }
}

/// Listener binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` binds loopback; any other host must be a literal address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = match self.host.to_ascii_lowercase().as_str() {
            "localhost" => IpAddr::from([127, 0, 0, 1]),
            literal => literal
                .parse()
                .map_err(|source| ConfigError::Host { source })?,
        };
        Ok(SocketAddr::from((ip, self.port)))
    }
}

/// Log filtering.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Sender identity for outbound status notification mail.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from_address: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JOBWORKS_PORT must be a number between 0 and 65535")]
    Port,
    #[error("JOBWORKS_HOST is neither 'localhost' nor a literal IP address")]
    Host { source: std::net::AddrParseError },
    #[error("JOBWORKS_MAIL_FROM must be an email address, got '{value}'")]
    Sender { value: String },
}
