//! Error types with fix suggestions
//!
//! Closed taxonomy for collaborator failures (network clients, local
//! files, rendering). The normalization pass never fails by contract,
//! so it has no variants here.

use std::path::PathBuf;
use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
#[derive(Error, Debug)]
pub enum FigspecError {
    #[error("{service} credentials are missing")]
    MissingCredentials { service: &'static str },

    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("Malformed design document: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl FixSuggestion for FigspecError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FigspecError::MissingCredentials { service } => match *service {
                "Figma" => {
                    Some("Set FIGMA_ACCESS_TOKEN in .env or pass --token / --figma-token")
                }
                _ => Some("Set ANTHROPIC_API_KEY in .env"),
            },
            FigspecError::Transport(_) => {
                Some("Check network connectivity (use --no-ssl-verify behind intercepting proxies)")
            }
            FigspecError::Api { .. } => {
                Some("Check the token/key is valid and has access to the requested resource")
            }
            FigspecError::InputNotFound { .. } => {
                Some("Run `figspec extract-figma` first, or check the -i path")
            }
            FigspecError::MalformedInput(_) => {
                Some("Ensure the input is a JSON file produced by `figspec extract-figma`")
            }
            FigspecError::Io(_) => Some("Check file path and permissions"),
            FigspecError::Render(_) => None,
        }
    }
}
