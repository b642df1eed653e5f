//! Environment configuration
//!
//! Credentials and transport settings resolved from the process
//! environment (a `.env` file is loaded at startup). SSL verification is
//! carried per client instance via [`TransportConfig`], never as a
//! process-global override.

use crate::error::FigspecError;

/// Figma personal access token
pub const FIGMA_TOKEN_VAR: &str = "FIGMA_ACCESS_TOKEN";

/// Anthropic API key
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Model override (defaults to [`DEFAULT_MODEL`])
pub const MODEL_VAR: &str = "FIGSPEC_MODEL";

/// SSL verification toggle ("true"/"false", default "true")
pub const VERIFY_SSL_VAR: &str = "VERIFY_SSL";

/// Default Claude model for scenario generation
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

/// Transport settings passed into each HTTP client instance
#[derive(Debug, Clone, Copy)]
pub struct TransportConfig {
    pub verify_ssl: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { verify_ssl: true }
    }
}

impl TransportConfig {
    pub fn new(verify_ssl: bool) -> Self {
        Self { verify_ssl }
    }

    /// Build a reqwest client honoring this transport configuration
    pub fn client(&self) -> Result<reqwest::Client, FigspecError> {
        let mut builder = reqwest::Client::builder();
        if !self.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(builder.build()?)
    }
}

/// Resolve the effective SSL-verification setting.
///
/// The `--no-ssl-verify` flag wins; otherwise `VERIFY_SSL` must be
/// exactly "true" (case-insensitive, default when unset).
pub fn verify_ssl(no_ssl_verify: bool) -> bool {
    resolve_verify_ssl(no_ssl_verify, std::env::var(VERIFY_SSL_VAR).ok())
}

fn resolve_verify_ssl(no_ssl_verify: bool, env_value: Option<String>) -> bool {
    if no_ssl_verify {
        return false;
    }
    env_value
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(true)
}

/// Figma token: CLI flag first, then environment
pub fn figma_token(flag: Option<String>) -> Result<String, FigspecError> {
    resolve_credential(flag, std::env::var(FIGMA_TOKEN_VAR).ok())
        .ok_or(FigspecError::MissingCredentials { service: "Figma" })
}

/// Anthropic API key: CLI flag first, then environment
pub fn anthropic_api_key(flag: Option<String>) -> Result<String, FigspecError> {
    resolve_credential(flag, std::env::var(ANTHROPIC_KEY_VAR).ok())
        .ok_or(FigspecError::MissingCredentials {
            service: "Anthropic",
        })
}

/// Model id: environment override, then the default
pub fn model_id() -> String {
    std::env::var(MODEL_VAR)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

fn resolve_credential(flag: Option<String>, env_value: Option<String>) -> Option<String> {
    flag.filter(|v| !v.is_empty())
        .or_else(|| env_value.filter(|v| !v.is_empty()))
}
