//! Configuration management for hamlog

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Band and mode reference tables used by the validator
    #[serde(default)]
    pub reference: ReferenceConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Page size used when a list request does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound applied to requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// CORS allowed origins (`*` or `*.domain` patterns accepted)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Reference tables for the QSO validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Recognised mode labels, matched case-insensitively
    #[serde(default = "default_modes")]
    pub modes: Vec<String>,

    /// Recognised bands with their frequency ranges
    #[serde(default = "default_bands")]
    pub bands: Vec<BandConfig>,
}

/// A band label and its inclusive frequency range in MHz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    /// Band label, e.g. `20M`
    pub label: String,
    /// Lower edge in MHz
    pub min_mhz: f64,
    /// Upper edge in MHz
    pub max_mhz: f64,
}

impl BandConfig {
    fn new(label: &str, min_mhz: f64, max_mhz: f64) -> Self {
        Self {
            label: label.to_string(),
            min_mhz,
            max_mhz,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://hamlog.db?mode=rwc".to_string())
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_min_connections() -> u32 {
    1
}

const fn default_connect_timeout() -> u64 {
    30
}

const fn default_idle_timeout() -> u64 {
    600
}

const fn default_page_size() -> u32 {
    50
}

const fn default_max_page_size() -> u32 {
    1000
}

const fn default_enable_cors() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_modes() -> Vec<String> {
    [
        "SSB", "CW", "FM", "AM", "RTTY", "FT8", "PSK31", "SSTV", "JT65", "JS8", "DMR", "D-STAR",
        "C4FM",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_bands() -> Vec<BandConfig> {
    vec![
        BandConfig::new("160M", 1.8, 2.0),
        BandConfig::new("80M", 3.5, 4.0),
        BandConfig::new("40M", 7.0, 7.3),
        BandConfig::new("30M", 10.1, 10.15),
        BandConfig::new("20M", 14.0, 14.35),
        BandConfig::new("17M", 18.068, 18.168),
        BandConfig::new("15M", 21.0, 21.45),
        BandConfig::new("12M", 24.89, 24.99),
        BandConfig::new("10M", 28.0, 29.7),
        BandConfig::new("6M", 50.0, 54.0),
        BandConfig::new("2M", 144.0, 148.0),
        BandConfig::new("70CM", 430.0, 450.0),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            enable_cors: default_enable_cors(),
            cors_origins: default_cors_origins(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            modes: default_modes(),
            bands: default_bands(),
        }
    }
}

impl Config {
    /// Load configuration from an optional `config` file and `HAMLOG_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `HAMLOG_DATABASE__URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("HAMLOG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);

        assert!(config.database.url.starts_with("sqlite:"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.min_connections, 1);

        assert_eq!(config.api.default_page_size, 50);
        assert_eq!(config.api.max_page_size, 1000);
        assert!(config.api.enable_cors);
        assert_eq!(config.api.cors_origins, vec!["*"]);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_default_reference_tables() {
        let reference = ReferenceConfig::default();

        assert_eq!(reference.modes.len(), 13);
        assert!(reference.modes.iter().any(|m| m == "D-STAR"));

        assert_eq!(reference.bands.len(), 12);
        let seventy = reference
            .bands
            .iter()
            .find(|b| b.label == "70CM")
            .expect("70CM band present");
        assert_eq!((seventy.min_mhz, seventy.max_mhz), (430.0, 450.0));
        assert!(reference.bands.iter().all(|b| b.label != "60M"));
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "server": {"host": "localhost"},
            "database": {"url": "sqlite::memory:"},
            "api": {"max_page_size": 200}
        }"#;

        let config: Config = serde_json::from_str(json_str).expect("partial config parses");

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.api.max_page_size, 200);
        assert_eq!(config.api.default_page_size, 50);
        assert_eq!(config.reference, ReferenceConfig::default());
    }

    #[test]
    fn test_custom_reference_tables() {
        let json_str = r#"{
            "reference": {
                "modes": ["CW", "FT4"],
                "bands": [{"label": "60M", "min_mhz": 5.3, "max_mhz": 5.4}]
            }
        }"#;

        let config: Config = serde_json::from_str(json_str).expect("reference config parses");

        assert_eq!(config.reference.modes, vec!["CW", "FT4"]);
        assert_eq!(
            config.reference.bands,
            vec![BandConfig::new("60M", 5.3, 5.4)]
        );
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();

        let serialized = serde_json::to_string(&config).expect("config serializes");
        let deserialized: Config = serde_json::from_str(&serialized).expect("config parses");

        assert_eq!(deserialized.server.port, config.server.port);
        assert_eq!(deserialized.api.max_page_size, config.api.max_page_size);
        assert_eq!(deserialized.reference, config.reference);
    }
}
