//! Provider clients.
//!
//! [`LlmClient`] is the seam the dispatcher talks to. [`Backend`] picks the
//! concrete client from the `provider` setting.

mod ollama;
mod openai;
mod sse;

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use sse::SseDecoder;

use crate::config::AppConfig;
use crate::domain::types::Provider;
use crate::error::LlmError;
use crate::settings::Settings;

/// Text fragments of one streamed response, in arrival order.
///
/// Finite and single-use. Ends after the last fragment or after the first
/// error.
pub struct ChunkStream {
    inner: BoxStream<'static, Result<String, LlmError>>,
}

impl ChunkStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<String, LlmError>> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        Self::new(stream::iter(chunks.into_iter().map(Ok)))
    }

    pub async fn next_chunk(&mut self) -> Option<Result<String, LlmError>> {
        self.inner.next().await
    }
}

impl Stream for ChunkStream {
    type Item = Result<String, LlmError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStream").finish_non_exhaustive()
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// One request, whole response
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Open a streamed response; `Ok(None)` when the provider cannot stream
    async fn generate_streaming(&self, prompt: &str) -> Result<Option<ChunkStream>, LlmError>;
}

/// The configured provider
#[derive(Debug, Clone)]
pub enum Backend {
    OpenAi(OpenAiClient),
    Ollama(OllamaClient),
}

impl Backend {
    pub fn from_settings(settings: &Settings, config: &AppConfig) -> Self {
        match settings.provider {
            Provider::OpenAi => {
                let api_key = settings
                    .api_key
                    .openai
                    .clone()
                    .or_else(|| config.openai_api_key.clone());
                Backend::OpenAi(OpenAiClient::new(
                    api_key,
                    settings.model.openai.id(),
                    &config.openai_base_url,
                ))
            }
            Provider::Ollama => Backend::Ollama(OllamaClient::new(
                settings.model.ollama.id(),
                &config.ollama_base_url,
            )),
        }
    }
}

#[async_trait]
impl LlmClient for Backend {
    fn provider(&self) -> Provider {
        match self {
            Backend::OpenAi(client) => client.provider(),
            Backend::Ollama(client) => client.provider(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        match self {
            Backend::OpenAi(client) => client.generate(prompt).await,
            Backend::Ollama(client) => client.generate(prompt).await,
        }
    }

    async fn generate_streaming(&self, prompt: &str) -> Result<Option<ChunkStream>, LlmError> {
        match self {
            Backend::OpenAi(client) => client.generate_streaming(prompt).await,
            Backend::Ollama(client) => client.generate_streaming(prompt).await,
        }
    }
}
