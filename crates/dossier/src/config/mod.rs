use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub resolution: ResolutionConfig,
    pub records: RecordsConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "5000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let resolution = ResolutionConfig {
            locker_table: env::var("DOSSIER_LOCKER_TABLE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            strict_lockers: parse_flag("DOSSIER_LOCKER_STRICT", true)?,
        };

        let records = RecordsConfig {
            public_url: var_or("DOSSIER_PUBLIC_URL", "http://127.0.0.1:5000"),
            bootstrap_username: var_or("DOSSIER_SUPERADMIN_USER", "superadmin"),
            bootstrap_password: var_or("DOSSIER_SUPERADMIN_PASSWORD", "SuperAdmin123"),
        };

        let mail = MailConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            resolution,
            records,
            mail,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { key, value: raw }),
        },
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the locker table comes from and how overlapping ranges are treated.
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    pub locker_table: Option<PathBuf>,
    pub strict_lockers: bool,
}

#[derive(Debug, Clone)]
pub struct RecordsConfig {
    pub public_url: String,
    pub bootstrap_username: String,
    pub bootstrap_password: String,
}

/// Outbound mail settings. `smtp` is `None` when the server or credentials are missing.
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    pub smtp: Option<SmtpSettings>,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = var_or("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidSmtpPort)?;

        let server = env::var("SMTP_SERVER").ok().filter(|v| !v.is_empty());
        let username = env::var("SMTP_USERNAME").ok().filter(|v| !v.is_empty());
        let password = env::var("SMTP_PASSWORD").ok().filter(|v| !v.is_empty());

        let smtp = match (server, username, password) {
            (Some(server), Some(username), Some(password)) => {
                let from = env::var("EMAIL_FROM")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| username.clone());
                Some(SmtpSettings {
                    server,
                    port,
                    username,
                    password,
                    from,
                })
            }
            _ => None,
        };

        Ok(Self { smtp })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidSmtpPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
