use std::collections::VecDeque;

use async_trait::async_trait;
use futures_util::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::sse::SseDecoder;
use super::{ChunkStream, LlmClient};
use crate::domain::types::Provider;
use crate::error::LlmError;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const PROVIDER: &str = "OpenAI";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

/// Chat-completions client for OpenAI and compatible servers
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    url: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            url: format!("{}{}", base_url.trim_end_matches('/'), CHAT_COMPLETIONS_PATH),
        }
    }

    async fn send(&self, prompt: &str, stream: bool) -> Result<reqwest::Response, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey(PROVIDER))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            stream,
        };

        debug!(model = %self.model, stream, "Sending chat completion request");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAI API returned {status}: {body}");
            return Err(LlmError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.send(prompt, false).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::malformed(PROVIDER, e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::malformed(PROVIDER, "no content in response"))
    }

    async fn generate_streaming(&self, prompt: &str) -> Result<Option<ChunkStream>, LlmError> {
        let response = self.send(prompt, true).await?;
        let body = Box::pin(response.bytes_stream());
        Ok(Some(ChunkStream::new(content_stream(body))))
    }
}

/// Text deltas carried by a streamed chat-completion body
fn content_stream<S, B>(body: S) -> impl Stream<Item = Result<String, LlmError>> + Send + 'static
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = (body, SseDecoder::new(), VecDeque::<String>::new());

    stream::unfold(state, |(mut body, mut decoder, mut pending)| async move {
        loop {
            if let Some(payload) = pending.pop_front() {
                match delta_content(&payload) {
                    Ok(Some(text)) => return Some((Ok(text), (body, decoder, pending))),
                    Ok(None) => continue,
                    Err(e) => {
                        decoder.close();
                        pending.clear();
                        return Some((Err(e), (body, decoder, pending)));
                    }
                }
            }

            if decoder.is_done() {
                return None;
            }

            match body.next().await {
                Some(Ok(bytes)) => pending.extend(decoder.feed(bytes.as_ref())),
                Some(Err(e)) => {
                    decoder.close();
                    return Some((Err(LlmError::Http(e)), (body, decoder, pending)));
                }
                None => pending.extend(decoder.finish()),
            }
        }
    })
}

fn delta_content(payload: &str) -> Result<Option<String>, LlmError> {
    let chunk: ChatChunk = serde_json::from_str(payload)
        .map_err(|e| LlmError::malformed(PROVIDER, format!("bad stream event: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(LlmError::malformed(PROVIDER, error.message));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|text| !text.is_empty()))
}
