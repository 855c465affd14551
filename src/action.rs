use crate::app::PromptInput;
use crate::domain::types::VideoTranscript;
use crate::llm::ChunkStream;

#[derive(Debug)]
pub enum Action {
    Open,
    Submit(PromptInput),
    TranscriptLoaded(Result<VideoTranscript, String>),
    Generated(Result<String, String>),
    StreamOpened(Result<Option<ChunkStream>, String>),
    ChunkReceived {
        chunk: Option<Result<String, String>>,
        stream: ChunkStream,
    },
}
