//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `POCKETBOOK_HOST` - Bind address (default: 127.0.0.1)
//! - `POCKETBOOK_PORT` - Listen port (default: 3000)
//! - `POCKETBOOK_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `POCKETBOOK_USERS` - Users resource, a file path or http(s) URL
//!   (default: crates/web/data/users.json, relative to the workspace root)
//! - `POCKETBOOK_STORE_PATH` - JSON file backing the contact store
//!   (default: in-memory)
//! - `WEATHER_API_KEY` - OpenWeatherMap API key (weather widget disabled without it)
//! - `WEATHER_CITY` - City shown by the weather widget (default: Oshawa)
//! - `WEATHER_ENDPOINT` - Current-weather endpoint (default: OpenWeatherMap)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Users resource shipped with the web crate, relative to the workspace root.
pub const DEFAULT_USERS_PATH: &str = "crates/web/data/users.json";

const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where the static users resource is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsersSource {
    /// A JSON file on disk.
    File(PathBuf),
    /// A JSON document fetched over HTTP.
    Url(Url),
}

impl UsersSource {
    /// Interpret a configured value: http(s) URLs are fetched, anything else is a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the value looks like a URL but does not parse.
    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(Self::Url(Url::parse(value)?))
        } else {
            Ok(Self::File(PathBuf::from(value)))
        }
    }
}

impl std::fmt::Display for UsersSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Pocketbook application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Static users resource consulted at login
    pub users: UsersSource,
    /// JSON file backing the contact store (in-memory when `None`)
    pub store_path: Option<PathBuf>,
    /// Weather widget configuration (disabled when `None`)
    pub weather: Option<WeatherConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Weather widget configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct WeatherConfig {
    /// Current-weather endpoint
    pub endpoint: Url,
    /// City to report on
    pub city: String,
    /// API key appended as `appid`
    pub api_key: SecretString,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("city", &self.city)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or if the weather API key
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("POCKETBOOK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("POCKETBOOK_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("POCKETBOOK_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("POCKETBOOK_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("POCKETBOOK_BASE_URL", "http://localhost:3000");
        let users = UsersSource::parse(&get_env_or_default("POCKETBOOK_USERS", DEFAULT_USERS_PATH))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("POCKETBOOK_USERS".to_string(), e.to_string())
            })?;
        let store_path = get_optional_env("POCKETBOOK_STORE_PATH").map(PathBuf::from);
        let weather = WeatherConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            users,
            store_path,
            weather,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl WeatherConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = get_optional_env("WEATHER_API_KEY") else {
            return Ok(None);
        };
        validate_secret_strength(&api_key, "WEATHER_API_KEY")?;

        let endpoint = Url::parse(&get_env_or_default("WEATHER_ENDPOINT", DEFAULT_WEATHER_ENDPOINT))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("WEATHER_ENDPOINT".to_string(), e.to_string())
            })?;

        Ok(Some(Self {
            endpoint,
            city: get_env_or_default("WEATHER_CITY", "Oshawa"),
            api_key: SecretString::from(api_key),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
            ),
        ));
    }

    Ok(())
}
