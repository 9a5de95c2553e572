//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VIBLE_API_HOST` - Bind address (default: 127.0.0.1)
//! - `VIBLE_API_PORT` - Listen port (default: 3001, falls back to `PORT`)
//! - `VIBLE_DATA_DIR` - Directory holding `signatures.json` (default: data)
//! - `VIBLE_FINGERPRINT_SALT` - Salt for client IP hashing (min 16 chars, high entropy)
//! - `VIBLE_TRUST_PROXY` - Read the client IP from proxy headers (default: false)
//! - `VIBLE_DUPLICATE_WINDOW_HOURS` - Duplicate detection window (default: 24)
//! - `VIBLE_CORS_ORIGINS` - Comma-separated allowed origins (default: any)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::TimeDelta;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;
use vible_core::signature::DUPLICATE_WINDOW_HOURS;

/// File name of the signature document inside the data directory.
pub const SIGNATURES_FILE: &str = "signatures.json";

const MIN_SALT_LENGTH: usize = 16;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
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

/// Signature API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the signature document
    pub data_dir: PathBuf,
    /// Salt mixed into client IP hashes
    pub fingerprint_salt: Option<SecretString>,
    /// Whether proxy headers carry the real client IP
    pub trust_proxy: bool,
    /// Rolling duplicate detection window, in hours
    pub duplicate_window_hours: i64,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or if the salt fails
    /// validation (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// See [`ApiConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_or("VIBLE_API_HOST", get("VIBLE_API_HOST"), "127.0.0.1")?;
        let port = match get("VIBLE_API_PORT") {
            Some(value) => parse_value("VIBLE_API_PORT", &value)?,
            None => parse_or("PORT", get("PORT"), "3001")?,
        };
        let data_dir = PathBuf::from(get("VIBLE_DATA_DIR").unwrap_or_else(|| "data".to_string()));

        let fingerprint_salt = get("VIBLE_FINGERPRINT_SALT")
            .map(|salt| {
                let salt = SecretString::from(salt);
                validate_salt(&salt, "VIBLE_FINGERPRINT_SALT")?;
                Ok::<_, ConfigError>(salt)
            })
            .transpose()?;

        let trust_proxy = get("VIBLE_TRUST_PROXY")
            .map(|v| parse_bool("VIBLE_TRUST_PROXY", &v))
            .transpose()?
            .unwrap_or(false);

        let duplicate_window_hours: i64 = parse_or(
            "VIBLE_DUPLICATE_WINDOW_HOURS",
            get("VIBLE_DUPLICATE_WINDOW_HOURS"),
            &DUPLICATE_WINDOW_HOURS.to_string(),
        )?;
        if duplicate_window_hours <= 0 || TimeDelta::try_hours(duplicate_window_hours).is_none()
        {
            return Err(ConfigError::InvalidEnvVar(
                "VIBLE_DUPLICATE_WINDOW_HOURS".to_string(),
                "must be a positive number of hours".to_string(),
            ));
        }

        let cors_origins = get("VIBLE_CORS_ORIGINS")
            .map(|v| parse_origins("VIBLE_CORS_ORIGINS", &v))
            .transpose()?
            .unwrap_or_default();

        let log_json = get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        let sentry = SentryConfig {
            dsn: get("SENTRY_DSN"),
            environment: get("SENTRY_ENVIRONMENT"),
            sample_rate: parse_or("SENTRY_SAMPLE_RATE", get("SENTRY_SAMPLE_RATE"), "1.0")?,
            traces_sample_rate: parse_or(
                "SENTRY_TRACES_SAMPLE_RATE",
                get("SENTRY_TRACES_SAMPLE_RATE"),
                "0.0",
            )?,
        };

        Ok(Self {
            host,
            port,
            data_dir,
            fingerprint_salt,
            trust_proxy,
            duplicate_window_hours,
            cors_origins,
            log_json,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Path of the signature document.
    #[must_use]
    pub fn signatures_path(&self) -> PathBuf {
        self.data_dir.join(SIGNATURES_FILE)
    }

    /// The fingerprint salt, if configured.
    #[must_use]
    pub fn salt(&self) -> Option<&str> {
        self.fingerprint_salt.as_ref().map(ExposeSecret::expose_secret)
    }

    /// The duplicate detection window, saturating at [`TimeDelta::MAX`].
    #[must_use]
    pub fn duplicate_window(&self) -> TimeDelta {
        TimeDelta::try_hours(self.duplicate_window_hours).unwrap_or(TimeDelta::MAX)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to a default when unset.
fn parse_or<T>(key: &str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, value.as_deref().unwrap_or(default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Parse a comma-separated list of origins (`scheme://host[:port]`).
fn parse_origins(key: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            let url = Url::parse(origin)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), format!("{origin}: {e}")))?;
            if url.host_str().is_none() {
                return Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    format!("{origin}: origin must have a host"),
                ));
            }
            Ok(url.origin().ascii_serialization())
        })
        .collect()
}

/// Validate that a salt is long enough, not a placeholder, and random-looking.
fn validate_salt(salt: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = salt.expose_secret();
    if value.chars().count() < MIN_SALT_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SALT_LENGTH,
                value.chars().count()
            ),
        ));
    }
    validate_secret_strength(value, var_name)
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.signatures_path(), PathBuf::from("data/signatures.json"));
        assert!(config.salt().is_none());
        assert!(!config.trust_proxy);
        assert_eq!(config.duplicate_window(), chrono::Duration::hours(24));
        assert!(config.cors_origins.is_empty());
        assert!(!config.log_json);
        assert!((config.sentry.sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_port_fallback() {
        assert_eq!(config_from(&[("PORT", "8080")]).unwrap().port, 8080);
        assert_eq!(
            config_from(&[("PORT", "8080"), ("VIBLE_API_PORT", "9090")])
                .unwrap()
                .port,
            9090
        );
        assert!(matches!(
            config_from(&[("VIBLE_API_PORT", "http")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("VIBLE_FINGERPRINT_SALT", "  "), ("PORT", "")]).unwrap();
        assert!(config.salt().is_none());
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn test_flags_and_window() {
        let config = config_from(&[
            ("VIBLE_TRUST_PROXY", "TRUE"),
            ("VIBLE_DUPLICATE_WINDOW_HOURS", "48"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert!(config.trust_proxy);
        assert_eq!(config.duplicate_window_hours, 48);
        assert!(config.log_json);

        assert!(config_from(&[("VIBLE_TRUST_PROXY", "maybe")]).is_err());
        assert!(config_from(&[("VIBLE_DUPLICATE_WINDOW_HOURS", "0")]).is_err());
    }

    #[test]
    fn test_window_out_of_range() {
        assert!(matches!(
            config_from(&[("VIBLE_DUPLICATE_WINDOW_HOURS", "3000000000000")]),
            Err(ConfigError::InvalidEnvVar(name, _)) if name == "VIBLE_DUPLICATE_WINDOW_HOURS"
        ));

        let mut config = config_from(&[]).unwrap();
        config.duplicate_window_hours = i64::MAX;
        assert_eq!(config.duplicate_window(), TimeDelta::MAX);
    }

    #[test]
    fn test_cors_origins() {
        let config = config_from(&[(
            "VIBLE_CORS_ORIGINS",
            "https://thevible.com, http://localhost:5173/",
        )])
        .unwrap();
        assert_eq!(
            config.cors_origins,
            ["https://thevible.com", "http://localhost:5173"]
        );

        assert!(config_from(&[("VIBLE_CORS_ORIGINS", "not a url")]).is_err());
    }

    #[test]
    fn test_salt_validation() {
        let good = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6";
        let config = config_from(&[("VIBLE_FINGERPRINT_SALT", good)]).unwrap();
        assert_eq!(config.salt(), Some(good));

        for bad in ["short", "changeme-changeme-123", "aaaaaaaaaaaaaaaaaaaaaaaa"] {
            assert!(matches!(
                config_from(&[("VIBLE_FINGERPRINT_SALT", bad)]),
                Err(ConfigError::InsecureSecret(_, _))
            ));
        }
    }

    #[test]
    fn test_debug_redacts_salt() {
        let salt = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6";
        let config = config_from(&[("VIBLE_FINGERPRINT_SALT", salt)]).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains(salt));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }
}
