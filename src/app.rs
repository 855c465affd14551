use crate::domain::types::CommandType;
use crate::editor::Position;

/// Where one generation action currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing started yet
    Idle,
    /// Waiting for the user's request text
    AwaitingInput,
    /// Loading the video transcript (youtube only)
    FetchingAuxiliaryData,
    /// Waiting on the provider, or consuming its stream
    Requesting,
    /// Result applied to the document
    Succeeded,
    /// Stopped with an error; message already shown to the user
    Failed(String),
}

/// What the user submitted from the prompt surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptInput {
    pub request: String,
    pub link: Option<String>,
}

impl PromptInput {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Input was refused before anything was requested
    Rejected,
    Succeeded,
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// State of a single user action
#[derive(Debug, Clone)]
pub struct Session {
    pub command: CommandType,
    pub state: SessionState,
    /// Raw request text, as recorded in recent prompts
    pub request: String,
    /// Cursor at submission; insertion point for cursor and youtube
    pub anchor: Position,
    /// Where the next streamed chunk goes
    pub insert_at: Position,
    pub streaming: bool,
    pub chunks_received: usize,
}

impl Session {
    pub fn new(command: CommandType) -> Self {
        Self {
            command,
            state: SessionState::Idle,
            request: String::new(),
            anchor: Position::ZERO,
            insert_at: Position::ZERO,
            streaming: false,
            chunks_received: 0,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.state == SessionState::Requesting && self.streaming
    }

    pub fn outcome(&self) -> Outcome {
        match &self.state {
            SessionState::Succeeded => Outcome::Succeeded,
            SessionState::Failed(message) => Outcome::Failed(message.clone()),
            SessionState::Idle | SessionState::AwaitingInput => Outcome::Rejected,
            SessionState::FetchingAuxiliaryData | SessionState::Requesting => {
                Outcome::Failed("Generation did not complete".to_string())
            }
        }
    }
}
