use thiserror::Error;

pub use crate::domain::template::TemplateError;

/// Failures talking to an LLM provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed {provider} response: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },

    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),
}

impl LlmError {
    pub fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider,
            message: message.into(),
        }
    }
}

/// Failures loading or changing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Rejected(String),
}

impl SettingsError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Template(_))
    }
}

/// Failures fetching a video transcript
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("not a YouTube link: {0}")]
    InvalidLink(String),

    #[error("no transcript source configured")]
    NotConfigured,

    #[error("transcript request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcript source returned {status}")]
    Status { status: u16 },

    #[error("video has no transcript")]
    Empty,
}
