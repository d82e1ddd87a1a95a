pub mod icp;

pub use icp::{IcpConfig, IcpConfigError, ScoringWeights};

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

/// Top-level configuration for the lead generation service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub providers: ProviderConfig,
    pub store: Option<StoreConfig>,
    pub export_dir: PathBuf,
    pub icp_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let providers = ProviderConfig {
            hunter_api_key: optional_var("HUNTER_API_KEY"),
            apollo_api_key: optional_var("APOLLO_API_KEY"),
            openai_api_key: optional_var("OPENAI_API_KEY"),
        };

        let store = match (optional_var("SUPABASE_URL"), optional_var("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(StoreConfig { url, key }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingCredential("SUPABASE_KEY")),
            (None, Some(_)) => return Err(ConfigError::MissingCredential("SUPABASE_URL")),
        };

        let export_dir = optional_var("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let icp_path = optional_var("ICP_CONFIG_PATH").map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            providers,
            store,
            export_dir,
            icp_path,
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// API keys for the contact, firmographic and text generation providers.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub hunter_api_key: Option<String>,
    pub apollo_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl ProviderConfig {
    /// Resolve every key the pipeline needs, naming the first one missing.
    pub fn require(&self) -> Result<ProviderKeys, ConfigError> {
        Ok(ProviderKeys {
            hunter: self.hunter()?.to_string(),
            apollo: self.apollo()?.to_string(),
            openai: self.openai()?.to_string(),
        })
    }

    pub fn hunter(&self) -> Result<&str, ConfigError> {
        credential(&self.hunter_api_key, "HUNTER_API_KEY")
    }

    pub fn apollo(&self) -> Result<&str, ConfigError> {
        credential(&self.apollo_api_key, "APOLLO_API_KEY")
    }

    pub fn openai(&self) -> Result<&str, ConfigError> {
        credential(&self.openai_api_key, "OPENAI_API_KEY")
    }
}

fn credential<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .ok_or(ConfigError::MissingCredential(name))
}

// Keys never reach log output.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("hunter_api_key", &self.hunter_api_key.as_ref().map(|_| "***"))
            .field("apollo_api_key", &self.apollo_api_key.as_ref().map(|_| "***"))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Clone)]
pub struct ProviderKeys {
    pub hunter: String,
    pub apollo: String,
    pub openai: String,
}

/// Connection settings for the hosted row store.
#[derive(Clone)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("key", &"***")
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingCredential(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingCredential(key) => {
                write!(f, "required environment variable '{key}' is not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::MissingCredential(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
