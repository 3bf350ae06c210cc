//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BIZDESK_SESSION_SECRET` - Session cookie signing secret (min 64 chars, high entropy)
//!
//! ## Optional
//! - `BIZDESK_HOST` - Bind address (default: 0.0.0.0)
//! - `BIZDESK_PORT` - Listen port, falls back to `PORT` (default: 10000)
//! - `BIZDESK_BASE_URL` - Public URL (default: `http://localhost:{port}`)
//! - `BIZDESK_ADMIN_USERNAME` - Seeded operator account (default: admin)
//! - `BIZDESK_ADMIN_PASSWORD_HASH` - Argon2 PHC hash for the operator account
//! - `BIZDESK_ADMIN_PASSWORD` - Plain operator password, hashed at startup
//! - `BIZDESK_LOW_STOCK_THRESHOLD` - Default low-stock threshold (default: 5)
//! - `BIZDESK_LOG_JSON` - Emit JSON log lines when set
//! - `MAIL_SERVER` / `MAIL_PORT` - SMTP relay (default: smtp.gmail.com:587)
//! - `MAIL_USERNAME` / `MAIL_PASSWORD` - SMTP credentials; mail is disabled without them
//! - `MAIL_DEFAULT_SENDER` - From address (default: `MAIL_USERNAME`)
//! - `FEEDBACK_RECIPIENT` - Feedback mailbox (default: the sender)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use bizdesk_core::{Email, Username};

/// Cookie signing keys must be at least 64 bytes.
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_PORT: &str = "10000";
const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
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

/// Bizdesk server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL (decides whether cookies are `Secure`)
    pub base_url: String,
    /// Session cookie signing secret
    pub session_secret: SecretString,
    /// Operator account seeded into the user store at startup
    pub admin: AdminSeed,
    /// Threshold used by the low-stock report when none is submitted
    pub low_stock_threshold: u32,
    /// Outbound mail settings; `None` disables feedback delivery
    pub mail: Option<MailConfig>,
    /// Emit JSON log lines instead of human-readable text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// The operator account created when the store starts empty.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: Username,
    pub password: AdminPassword,
}

/// Where the operator password comes from.
///
/// `Debug` never prints the secret itself.
#[derive(Clone)]
pub enum AdminPassword {
    /// A ready-made argon2 PHC string.
    Hash(SecretString),
    /// A plain password to hash at startup.
    Plain(SecretString),
    /// Nothing configured; a random password was generated.
    Generated(SecretString),
}

impl std::fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Hash(_) => "Hash",
            Self::Plain(_) => "Plain",
            Self::Generated(_) => "Generated",
        };
        f.debug_tuple(kind).field(&"[REDACTED]").finish()
    }
}

/// SMTP settings for the feedback mailbox.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct MailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Sender address (From header)
    pub from_address: Email,
    /// Mailbox that receives feedback
    pub feedback_recipient: Email,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("feedback_recipient", &self.feedback_recipient)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("BIZDESK_HOST", "0.0.0.0")?;
        let port_raw = get_optional_env("BIZDESK_PORT")
            .or_else(|| get_optional_env("PORT"))
            .unwrap_or_else(|| DEFAULT_PORT.to_string());
        let port = port_raw
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BIZDESK_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("BIZDESK_BASE_URL", &format!("http://localhost:{port}"));
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BIZDESK_BASE_URL".to_string(), e.to_string())
        })?;

        let session_secret = get_required_secret("BIZDESK_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "BIZDESK_SESSION_SECRET")?;
        validate_secret_strength(session_secret.expose_secret(), "BIZDESK_SESSION_SECRET")?;

        let admin = AdminSeed::from_env()?;
        let low_stock_threshold = parse_env(
            "BIZDESK_LOW_STOCK_THRESHOLD",
            &DEFAULT_LOW_STOCK_THRESHOLD.to_string(),
        )?;
        let mail = MailConfig::from_env()?;
        let log_json = get_optional_env("BIZDESK_LOG_JSON").is_some();

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            admin,
            low_stock_threshold,
            mail,
            log_json,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl AdminSeed {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("BIZDESK_ADMIN_USERNAME", "admin");
        let username = Username::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("BIZDESK_ADMIN_USERNAME".to_string(), e.to_string())
        })?;

        let password = if let Some(hash) = get_optional_env("BIZDESK_ADMIN_PASSWORD_HASH") {
            if !hash.starts_with("$argon2") {
                return Err(ConfigError::InvalidEnvVar(
                    "BIZDESK_ADMIN_PASSWORD_HASH".to_string(),
                    "expected an argon2 PHC string".to_string(),
                ));
            }
            AdminPassword::Hash(SecretString::from(hash))
        } else if let Some(plain) = get_optional_env("BIZDESK_ADMIN_PASSWORD") {
            AdminPassword::Plain(SecretString::from(plain))
        } else {
            AdminPassword::Generated(SecretString::from(generate_password()))
        };

        Ok(Self { username, password })
    }
}

impl MailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(smtp_username), Some(password)) = (
            get_optional_env("MAIL_USERNAME"),
            get_optional_env("MAIL_PASSWORD"),
        ) else {
            return Ok(None);
        };

        let sender_raw = get_env_or_default("MAIL_DEFAULT_SENDER", &smtp_username);
        let from_address = parse_email("MAIL_DEFAULT_SENDER", &sender_raw)?;
        let feedback_recipient = match get_optional_env("FEEDBACK_RECIPIENT") {
            Some(raw) => parse_email("FEEDBACK_RECIPIENT", &raw)?,
            None => from_address.clone(),
        };

        Ok(Some(Self {
            smtp_host: get_env_or_default("MAIL_SERVER", "smtp.gmail.com"),
            smtp_port: parse_env("MAIL_PORT", "587")?,
            smtp_username,
            smtp_password: SecretString::from(password),
            from_address,
            feedback_recipient,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(key)
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_email(key: &str, raw: &str) -> Result<Email, ConfigError> {
    Email::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Generate a 20-character alphanumeric password for the operator account.
fn generate_password() -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;

    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
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
