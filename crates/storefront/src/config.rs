//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SECRET_KEY` - Session signing secret (min 32 chars, high entropy)
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `APP_NAME` - Display name (default: Football Shop)
//! - `ITEMS_PER_PAGE` - Catalog page size, 1-100 (default: 12)
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use thiserror::Error;

const MIN_SECRET_KEY_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MAX_ITEMS_PER_PAGE: u32 = 100;

const DEFAULT_APP_NAME: &str = "Football Shop";
const DEFAULT_ITEMS_PER_PAGE: u32 = 12;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "change-me",
    "replace",
    "placeholder",
    "example",
    "dev-secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Display name shown in page titles and the header
    pub app_name: String,
    /// Catalog page size
    pub items_per_page: u32,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Session signing secret
    pub secret_key: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the secret key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let secret_key = env.required("SECRET_KEY")?;
        validate_secret_key(&secret_key, "SECRET_KEY")?;
        validate_secret_strength(&secret_key, "SECRET_KEY")?;

        let database_url = SecretString::from(env.required("DATABASE_URL")?);

        let app_name = env
            .optional("APP_NAME")
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_owned());

        let items_per_page = env.parsed("ITEMS_PER_PAGE", DEFAULT_ITEMS_PER_PAGE)?;
        if !(1..=MAX_ITEMS_PER_PAGE).contains(&items_per_page) {
            return Err(ConfigError::InvalidEnvVar(
                "ITEMS_PER_PAGE".to_owned(),
                format!("must be between 1 and {MAX_ITEMS_PER_PAGE}"),
            ));
        }

        let host = env.parsed::<IpAddr>("HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parsed::<u16>("PORT", 3000)?;
        let base_url = env
            .optional("BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BASE_URL".to_owned(), e.to_string()))?;

        Ok(Self {
            app_name,
            items_per_page,
            database_url,
            host,
            port,
            base_url,
            secret_key: SecretString::from(secret_key),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// 64 bytes of key material for signing session cookies.
    #[must_use]
    pub fn cookie_key_material(&self) -> [u8; 64] {
        Sha512::digest(self.secret_key.expose_secret().as_bytes()).into()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Non-blank value of a key, if set.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
        })
    }
}

/// Validate that the secret key meets minimum length requirements.
fn validate_secret_key(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SECRET_KEY_LENGTH,
                secret.len()
            ),
        ));
    }
    Ok(())
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
            #[allow(clippy::cast_precision_loss)]
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
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
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

    const GOOD_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SECRET_KEY", GOOD_SECRET),
            ("DATABASE_URL", "postgres://localhost/football_shop"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&minimal()).unwrap();
        assert_eq!(config.app_name, "Football Shop");
        assert_eq!(config.items_per_page, 12);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(!config.is_secure());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = minimal();
        pairs.extend([
            ("APP_NAME", "Kit Room"),
            ("ITEMS_PER_PAGE", "24"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("BASE_URL", "https://shop.example.org"),
        ]);
        let config = load(&pairs).unwrap();
        assert_eq!(config.app_name, "Kit Room");
        assert_eq!(config.items_per_page, 24);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_secure());
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[("SECRET_KEY", GOOD_SECRET)]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "DATABASE_URL"));

        let err = load(&[("DATABASE_URL", "postgres://x")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "SECRET_KEY"));
    }

    #[test]
    fn test_items_per_page_range() {
        for bad in ["0", "101", "-1", "many"] {
            let mut pairs = minimal();
            pairs.push(("ITEMS_PER_PAGE", bad));
            assert!(
                matches!(load(&pairs), Err(ConfigError::InvalidEnvVar(..))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = minimal();
        pairs.push(("PORT", "70000"));
        assert!(matches!(load(&pairs), Err(ConfigError::InvalidEnvVar(..))));
    }

    #[test]
    fn test_placeholder_secret_rejected() {
        let pairs = [
            ("SECRET_KEY", "dev-secret-key-change-me-please-now"),
            ("DATABASE_URL", "postgres://x"),
        ];
        assert!(matches!(load(&pairs), Err(ConfigError::InsecureSecret(..))));
    }

    #[test]
    fn test_short_secret_rejected() {
        let pairs = [("SECRET_KEY", "aB3$xY9!"), ("DATABASE_URL", "postgres://x")];
        assert!(matches!(load(&pairs), Err(ConfigError::InsecureSecret(..))));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy(GOOD_SECRET) > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_low_entropy_rejected() {
        let result = validate_secret_strength(&"ab".repeat(20), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(..))));
    }

    #[test]
    fn test_cookie_key_is_stable() {
        let a = load(&minimal()).unwrap();
        let b = load(&minimal()).unwrap();
        assert_eq!(a.cookie_key_material(), b.cookie_key_material());
        assert_eq!(a.cookie_key_material().len(), 64);
    }
}
