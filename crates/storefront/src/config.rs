//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SANITY_PROJECT_ID` - Sanity project ID (e.g., `5jpf3dr5`)
//! - `SHOP_WHATSAPP_NUMBER` - Destination phone number for order messages
//!   (digits, optionally with a leading `+`, spaces, or dashes)
//!
//! ## Optional
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - API version date (default: 2024-01-01)
//! - `SANITY_USE_CDN` - Query the CDN endpoint (default: true)
//! - `SANITY_API_TOKEN` - Bearer token for private datasets
//! - `CART_STORAGE_PATH` - Cart snapshot file (default: whatsapp-shop-cart.json)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop application configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Sanity CMS configuration
    pub sanity: SanityConfig,
    /// Destination WhatsApp number, normalized to digits only
    pub whatsapp_number: String,
    /// Path of the cart snapshot file
    pub cart_storage_path: PathBuf,
}

/// Sanity CMS connection configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Sanity project ID (e.g., `5jpf3dr5`)
    pub project_id: String,
    /// Dataset name (e.g., `production`)
    pub dataset: String,
    /// API version date (e.g., `2024-01-01`)
    pub api_version: String,
    /// Whether to query the CDN endpoint (`apicdn.sanity.io`)
    pub use_cdn: bool,
    /// Bearer token for private datasets (public datasets need none)
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let sanity = SanityConfig::from_env()?;
        let whatsapp_number =
            normalize_phone_number(&get_required_env("SHOP_WHATSAPP_NUMBER")?)
                .map_err(|reason| {
                    ConfigError::InvalidEnvVar("SHOP_WHATSAPP_NUMBER".to_string(), reason)
                })?;
        let cart_storage_path = PathBuf::from(get_env_or_default(
            "CART_STORAGE_PATH",
            "whatsapp-shop-cart.json",
        ));

        Ok(Self {
            sanity,
            whatsapp_number,
            cart_storage_path,
        })
    }
}

impl SanityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let project_id = get_required_env("SANITY_PROJECT_ID")?;
        validate_project_id(&project_id)
            .map_err(|reason| ConfigError::InvalidEnvVar("SANITY_PROJECT_ID".to_string(), reason))?;

        let use_cdn = parse_bool(&get_env_or_default("SANITY_USE_CDN", "true"))
            .map_err(|reason| ConfigError::InvalidEnvVar("SANITY_USE_CDN".to_string(), reason))?;

        Ok(Self {
            project_id,
            dataset: get_env_or_default("SANITY_DATASET", "production"),
            api_version: get_env_or_default("SANITY_API_VERSION", "2024-01-01"),
            use_cdn,
            api_token: get_optional_env("SANITY_API_TOKEN").map(SecretString::from),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag, accepting `true`/`false`/`1`/`0` (case-insensitive).
fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(format!("expected true/false, got '{other}'")),
    }
}

/// Normalize a phone number to bare digits for the `wa` deep-link.
///
/// Accepts a leading `+` and common separators (spaces, dashes, dots,
/// parentheses); anything else is rejected.
fn normalize_phone_number(raw: &str) -> Result<String, String> {
    let mut digits = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '0'..='9' => digits.push(c),
            '+' | ' ' | '-' | '.' | '(' | ')' => {}
            other => return Err(format!("unexpected character '{other}'")),
        }
    }
    if digits.is_empty() {
        return Err("no digits found".to_string());
    }
    Ok(digits)
}

/// Validate a Sanity project ID (lowercase alphanumeric, as issued).
fn validate_project_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("must not be empty".to_string());
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("must be lowercase alphanumeric".to_string());
    }
    Ok(())
}
