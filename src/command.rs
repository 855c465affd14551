use tracing::warn;

use crate::action::Action;
use crate::domain::types::GenerationRequest;
use crate::llm::{ChunkStream, LlmClient};
use crate::settings::SettingsStore;
use crate::transcript::TranscriptSource;

pub enum Command {
    FetchTranscript { link: String },
    Generate(GenerationRequest),
    PullChunk(ChunkStream),
    RecordRecentPrompt(String),
}

/// Collaborators commands run against
pub struct Services<'a> {
    pub client: &'a dyn LlmClient,
    pub transcripts: &'a dyn TranscriptSource,
    pub store: &'a mut SettingsStore,
    pub transcript_lang: &'a str,
}

pub async fn execute_command(command: Command, services: &mut Services<'_>) -> Option<Action> {
    match command {
        Command::FetchTranscript { link } => {
            let result = services
                .transcripts
                .fetch(&link, services.transcript_lang)
                .await
                .map_err(|e| e.to_string());
            Some(Action::TranscriptLoaded(result))
        }
        Command::Generate(request) if request.streaming => {
            let result = services
                .client
                .generate_streaming(&request.prompt)
                .await
                .map_err(|e| e.to_string());
            Some(Action::StreamOpened(result))
        }
        Command::Generate(request) => {
            let result = services
                .client
                .generate(&request.prompt)
                .await
                .map_err(|e| e.to_string());
            Some(Action::Generated(result))
        }
        Command::PullChunk(mut stream) => {
            let chunk = stream
                .next_chunk()
                .await
                .map(|c| c.map_err(|e| e.to_string()));
            Some(Action::ChunkReceived { chunk, stream })
        }
        Command::RecordRecentPrompt(prompt) => {
            if let Err(e) = services.store.record_recent_prompt(&prompt) {
                warn!("Failed to save recent prompt: {e}");
            }
            None
        }
    }
}
