use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ChunkStream, LlmClient};
use crate::domain::types::Provider;
use crate::error::LlmError;

const GENERATE_PATH: &str = "/api/generate";
const PROVIDER: &str = "Ollama";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Client for a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    model: String,
    url: String,
}

impl OllamaClient {
    pub fn new(model: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            url: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH),
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            prompt,
            model: &self.model,
            stream: false,
        };

        debug!(model = %self.model, url = %self.url, "Sending generate request");
        let response = self.client.post(&self.url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Ollama returned {status}: {body}");
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::malformed(PROVIDER, e.to_string()))?;

        body.response
            .filter(|r| !r.is_empty())
            .ok_or_else(|| LlmError::malformed(PROVIDER, "no response field"))
    }

    async fn generate_streaming(&self, _prompt: &str) -> Result<Option<ChunkStream>, LlmError> {
        debug!("Streaming requested from Ollama; not supported");
        Ok(None)
    }
}
