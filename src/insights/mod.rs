//! Insight generation against an external language model
//!
//! Defines the provider contract plus the Ollama implementation.

pub mod ollama;

use async_trait::async_trait;
use std::fmt;

pub use ollama::{OllamaConfig, OllamaInsights};

/// Error types for insight generation
#[derive(Debug, Clone)]
pub enum InsightError {
    /// Provider not reachable (e.g. Ollama not running)
    ProviderUnavailable(String),
    /// Requested model is not in the provider's available list
    ModelNotFound(String),
    /// Request failed (network, timeout, server error)
    RequestFailed(String),
    /// Response could not be decoded
    InvalidResponse(String),
}

impl fmt::Display for InsightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightError::ProviderUnavailable(msg) => write!(f, "Provider unavailable: {}", msg),
            InsightError::ModelNotFound(msg) => write!(f, "Model not found: {}", msg),
            InsightError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            InsightError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for InsightError {}

/// Contract for the external insight language model
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// List the model names currently available on the provider
    async fn list_models(&self) -> Result<Vec<String>, InsightError>;

    /// Generate insight text from a transcript. The prompt template's
    /// literal `{{text}}` placeholder is replaced with `text` before the
    /// request is sent.
    async fn generate(
        &self,
        text: &str,
        prompt_template: &str,
        model_name: &str,
    ) -> Result<String, InsightError>;
}
