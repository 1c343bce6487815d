use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Default EmailJS REST endpoint for templated sends.
pub const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

const DEFAULT_EMAILJS_TIMEOUT_SECS: u64 = 15;

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
    pub email: EmailJsConfig,
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            email: EmailJsConfig::from_env()?,
            analytics: AnalyticsConfig::from_env(),
        })
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

/// Template identifiers, one per enquiry kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIds {
    pub sourcing: String,
    pub contact: String,
    pub partner: String,
}

/// Credentials and endpoints for the EmailJS REST API.
///
/// `public_key` is `None` when the variable is missing or still holds the
/// `YOUR_PUBLIC_KEY` placeholder; sends are refused in that case.
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub api_url: String,
    pub service_id: String,
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    pub templates: TemplateIds,
    pub timeout: Duration,
}

impl EmailJsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match env::var("EMAILJS_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_EMAILJS_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: env::var("EMAILJS_API_URL")
                .unwrap_or_else(|_| DEFAULT_EMAILJS_API_URL.to_string()),
            service_id: env::var("EMAILJS_SERVICE_ID")
                .unwrap_or_else(|_| "YOUR_SERVICE_ID".to_string()),
            public_key: configured("EMAILJS_PUBLIC_KEY", "YOUR_PUBLIC_KEY"),
            private_key: configured("EMAILJS_PRIVATE_KEY", "YOUR_PRIVATE_KEY"),
            templates: TemplateIds {
                sourcing: env::var("EMAILJS_TEMPLATE_SOURCING")
                    .unwrap_or_else(|_| "YOUR_SOURCING_TEMPLATE_ID".to_string()),
                contact: env::var("EMAILJS_TEMPLATE_CONTACT")
                    .unwrap_or_else(|_| "YOUR_CONTACT_TEMPLATE_ID".to_string()),
                partner: env::var("EMAILJS_TEMPLATE_PARTNER")
                    .unwrap_or_else(|_| "YOUR_PARTNER_TEMPLATE_ID".to_string()),
            },
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Umami website analytics. Events are only logged when `host` or
/// `website_id` is missing.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    pub host: Option<String>,
    pub website_id: Option<String>,
    pub hostname: String,
}

impl AnalyticsConfig {
    fn from_env() -> Self {
        Self {
            host: configured("UMAMI_HOST", ""),
            website_id: configured("UMAMI_WEBSITE_ID", ""),
            hostname: env::var("UMAMI_HOSTNAME").unwrap_or_else(|_| "imweracoffee.com".to_string()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.host.is_some() && self.website_id.is_some()
    }
}

fn configured(key: &str, placeholder: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != placeholder)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "EMAILJS_TIMEOUT_SECS must be a positive number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
