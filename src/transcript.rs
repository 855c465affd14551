//! YouTube transcript retrieval.
//!
//! The transcript service is external: it takes a video link and a language
//! code and answers with `{videoDetails: {title, author, keywords}, transcript: [{text}]}`.

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use crate::domain::types::VideoTranscript;
use crate::error::TranscriptError;

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, link: &str, lang: &str) -> Result<VideoTranscript, TranscriptError>;
}

/// Extract the video id from the common YouTube link shapes
pub fn video_id(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let id = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("shorts") | Some("embed") | Some("live") => segments.next().map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    }?;

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

/// Transcript service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpTranscriptSource {
    client: reqwest::Client,
    url: Option<String>,
}

impl HttpTranscriptSource {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl TranscriptSource for HttpTranscriptSource {
    async fn fetch(&self, link: &str, lang: &str) -> Result<VideoTranscript, TranscriptError> {
        if video_id(link).is_none() {
            return Err(TranscriptError::InvalidLink(link.to_string()));
        }
        let base = self.url.as_deref().ok_or(TranscriptError::NotConfigured)?;
        let url = Url::parse_with_params(base, &[("link", link), ("lang", lang)])
            .map_err(|_| TranscriptError::NotConfigured)?;

        debug!(%url, "Fetching transcript");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            warn!("Transcript source returned {status}");
            return Err(TranscriptError::Status {
                status: status.as_u16(),
            });
        }

        let video: VideoTranscript = response.json().await?;
        if video.segments.is_empty() {
            return Err(TranscriptError::Empty);
        }
        Ok(video)
    }
}
