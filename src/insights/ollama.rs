//! Ollama API insight provider
//!
//! Connects to a running Ollama server (default: localhost:11434)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{InsightError, InsightProvider};

/// Ollama generate request
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Ollama generate response
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}

/// Ollama model list response
#[derive(Debug, Deserialize)]
struct OllamaModelList {
    models: Vec<OllamaModelEntry>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelEntry {
    name: String,
}

/// Ollama provider configuration
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Ollama-backed insight provider
pub struct OllamaInsights {
    config: OllamaConfig,
    client: Client,
}

impl OllamaInsights {
    pub fn new(config: OllamaConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    pub fn with_default_config() -> Self {
        Self::new(OllamaConfig::default())
    }
}

#[async_trait]
impl InsightProvider for OllamaInsights {
    async fn list_models(&self) -> Result<Vec<String>, InsightError> {
        let url = format!("{}/api/tags", self.config.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            InsightError::ProviderUnavailable(format!("Cannot connect to Ollama: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(InsightError::RequestFailed(
                "Failed to list Ollama models".to_string(),
            ));
        }

        let model_list: OllamaModelList = response
            .json()
            .await
            .map_err(|e| InsightError::InvalidResponse(format!("Invalid response: {}", e)))?;

        Ok(model_list.models.into_iter().map(|m| m.name).collect())
    }

    async fn generate(
        &self,
        text: &str,
        prompt_template: &str,
        model_name: &str,
    ) -> Result<String, InsightError> {
        // Verify the model exists before sending a potentially long request
        let models = self.list_models().await?;
        if !models.iter().any(|m| m == model_name) {
            return Err(InsightError::ModelNotFound(format!(
                "Model '{}' not found in Ollama. Available models: {:?}",
                model_name, models
            )));
        }

        let prompt = prompt_template.replace("{{text}}", text);
        let url = format!("{}/api/generate", self.config.base_url);

        let request = OllamaGenerateRequest {
            model: model_name.to_string(),
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::RequestFailed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InsightError::RequestFailed(format!(
                "Ollama returned error: {}",
                error_text
            )));
        }

        let generate_response: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::InvalidResponse(format!("Invalid response: {}", e)))?;

        Ok(generate_response.response.trim().to_string())
    }
}
