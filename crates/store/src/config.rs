//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `EMPORIUM_ADMIN_PASSWORD` - Password for the seeded admin account
//!   (min 16 chars, high entropy)
//! - `EMPORIUM_TOKEN_SECRET` - HMAC secret for API tokens (min 32 chars,
//!   high entropy)
//!
//! ## Optional
//! - `EMPORIUM_HOST` - Bind address (default: 127.0.0.1)
//! - `EMPORIUM_PORT` - Listen port (default: 5001)
//! - `EMPORIUM_BASE_URL` - Public URL (default: http://localhost:5001)
//! - `EMPORIUM_ADMIN_EMAIL` - Email of the seeded admin (default:
//!   admin@emporium.test)
//! - `EMPORIUM_DOCS_DIR` - Root directory of product documents served by
//!   the document viewer (default: crates/store/content/docs)
//! - `EMPORIUM_STATIC_DIR` - Root directory of static assets
//!   (default: crates/store/static)
//! - `EMPORIUM_UPLOAD_DIR` - Directory for receipt uploads
//!   (default: ./uploads)
//! - `EMPORIUM_ALLOWED_ORIGINS` - Comma-separated CORS origin allowlist
//!   (default: empty, same-origin only)
//! - `EMPORIUM_FETCH_ALLOWED_HOSTS` - Comma-separated host allowlist for
//!   the link-preview fetcher (default: empty, fetcher refuses everything)
//!
//! Secrets never have defaults and never appear in logs: they are loaded
//! into [`SecretString`] and rejected at startup when they look like
//! placeholders or have too little entropy.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use emporium_core::Email;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 16;
const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "insecure",
    "xxx",
    "todo",
    "fixme",
    "insert",
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

/// Store application configuration.
///
/// All secret fields are [`SecretString`], so the derived `Debug` output
/// redacts them.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Public base URL (used to decide whether cookies are Secure).
    pub base_url: String,
    /// Password for the seeded admin account, hashed at startup.
    pub admin_password: SecretString,
    /// Email address of the seeded admin account.
    pub admin_email: Email,
    /// HMAC secret for API token signing.
    pub token_secret: SecretString,
    /// Root directory for the document viewer.
    pub docs_dir: PathBuf,
    /// Root directory for static assets.
    pub static_dir: PathBuf,
    /// Directory for uploaded files.
    pub upload_dir: PathBuf,
    /// CORS origin allowlist. Empty means same-origin only.
    pub allowed_origins: Vec<String>,
    /// Host allowlist for the link-preview fetcher.
    pub fetch_allowed_hosts: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid,
    /// or if secrets fail validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("EMPORIUM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("EMPORIUM_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("EMPORIUM_PORT", "5001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("EMPORIUM_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("EMPORIUM_BASE_URL", "http://localhost:5001");

        let admin_password = get_validated_secret("EMPORIUM_ADMIN_PASSWORD")?;
        validate_secret_length(
            &admin_password,
            "EMPORIUM_ADMIN_PASSWORD",
            MIN_ADMIN_PASSWORD_LENGTH,
        )?;
        let token_secret = get_validated_secret("EMPORIUM_TOKEN_SECRET")?;
        validate_secret_length(&token_secret, "EMPORIUM_TOKEN_SECRET", MIN_TOKEN_SECRET_LENGTH)?;

        let admin_email_raw = get_env_or_default("EMPORIUM_ADMIN_EMAIL", "admin@emporium.test");
        let admin_email = Email::parse(&admin_email_raw).map_err(|e| {
            ConfigError::InvalidEnvVar("EMPORIUM_ADMIN_EMAIL".to_string(), e.to_string())
        })?;

        let docs_dir =
            PathBuf::from(get_env_or_default("EMPORIUM_DOCS_DIR", "crates/store/content/docs"));
        let static_dir =
            PathBuf::from(get_env_or_default("EMPORIUM_STATIC_DIR", "crates/store/static"));
        let upload_dir = PathBuf::from(get_env_or_default("EMPORIUM_UPLOAD_DIR", "./uploads"));

        let allowed_origins = get_list_env("EMPORIUM_ALLOWED_ORIGINS");
        let fetch_allowed_hosts = get_list_env("EMPORIUM_FETCH_ALLOWED_HOSTS")
            .into_iter()
            .map(|h| h.to_lowercase())
            .collect();

        Ok(Self {
            host,
            port,
            base_url,
            admin_password,
            admin_email,
            token_secret,
            docs_dir,
            static_dir,
            upload_dir,
            allowed_origins,
            fetch_allowed_hosts,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the store is served over HTTPS (controls Secure cookies).
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a comma-separated environment variable as a list, dropping empties.
fn get_list_env(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Validate that a secret meets a minimum length requirement.
fn validate_secret_length(
    secret: &SecretString,
    var_name: &str,
    min: usize,
) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < min {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {min} characters (got {})", value.len()),
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
    let len = s.len() as f64;
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
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real secrets (random API keys, generated passwords) have high entropy
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

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
