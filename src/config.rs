use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Store identity printed on receipts and reports.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreInfo {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_store_tagline")]
    pub tagline: String,

    #[serde(default = "default_support_contact")]
    pub support_contact: String,

    /// Currency label for printed amounts; amounts themselves are plain
    /// integer currency units (single-currency system).
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            tagline: default_store_tagline(),
            support_contact: default_support_contact(),
            currency: default_currency(),
        }
    }
}

fn default_store_name() -> String {
    "Smart Computers".to_string()
}

fn default_store_tagline() -> String {
    "Your Trusted Tech Store".to_string()
}

fn default_support_contact() -> String {
    "support@smartcomputers.com | +254 797 469 560".to_string()
}

fn default_currency() -> String {
    "KES".to_string()
}

/// Application configuration, loaded from the `config/` file tree layered
/// with `STOREFRONT__*` environment variables.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "database_url must not be empty"))]
    pub database_url: String,

    /// Server bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// Store branding used by document rendering
    #[serde(default)]
    pub store: StoreInfo,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_min_connections() -> u32 {
    1
}

impl AppConfig {
    /// Minimal constructor used by tests and embedders; file/env loading
    /// goes through [`load_config`].
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            store: StoreInfo::default(),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads configuration from `config/default`, `config/<environment>` and
/// `STOREFRONT__*` environment variables, in increasing precedence.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment = std::env::var("STOREFRONT_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let settings = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, environment)).required(false))
        .add_source(Environment::with_prefix("STOREFRONT").separator("__"))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config
        .validate()
        .map_err(|e| ConfigError::Message(e.to_string()))?;
    Ok(config)
}

/// Initializes the global tracing subscriber. Idempotent so test binaries
/// can call it repeatedly.
pub fn init_tracing(level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
