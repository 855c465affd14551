//! Prompt templating and generation dispatch for editor plugins.
//!
//! A user action (`selection`, `cursor`, `document`, `youtube`) fills the
//! matching prompt template, sends it to the configured provider and writes
//! the answer back into an [`editor::Editor`], whole or streamed.

pub mod action;
pub mod app;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod editor;
pub mod error;
pub mod llm;
pub mod notify;
pub mod settings;
pub mod transcript;
pub mod update;

pub use app::{Outcome, PromptInput};
pub use config::AppConfig;
pub use dispatcher::Dispatcher;
pub use domain::types::{CommandType, Provider};
pub use editor::{Editor, Position, TextBuffer};
pub use llm::{Backend, ChunkStream, LlmClient};
pub use notify::{ConsoleNotifier, MemoryNotifier, Notifier};
pub use settings::{JsonFileStore, MemoryStore, Settings, SettingsStore};
pub use transcript::{HttpTranscriptSource, TranscriptSource};
