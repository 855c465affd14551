//! Drives one user action from submission to an [`Outcome`].

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use crate::action::Action;
use crate::app::{Outcome, PromptInput, Session};
use crate::command::{Services, execute_command};
use crate::config::DEFAULT_TRANSCRIPT_LANG;
use crate::domain::types::CommandType;
use crate::editor::Editor;
use crate::llm::LlmClient;
use crate::notify::Notifier;
use crate::settings::SettingsStore;
use crate::transcript::TranscriptSource;
use crate::update::{self, Context};

pub struct Dispatcher<'a> {
    store: &'a mut SettingsStore,
    client: &'a dyn LlmClient,
    transcripts: &'a dyn TranscriptSource,
    notifier: Arc<dyn Notifier>,
    transcript_lang: String,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        store: &'a mut SettingsStore,
        client: &'a dyn LlmClient,
        transcripts: &'a dyn TranscriptSource,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            client,
            transcripts,
            notifier,
            transcript_lang: DEFAULT_TRANSCRIPT_LANG.to_string(),
        }
    }

    pub fn with_transcript_lang(mut self, lang: impl Into<String>) -> Self {
        self.transcript_lang = lang.into();
        self
    }

    /// Run `command` with the submitted input against `editor`.
    ///
    /// The editor is only written once the provider has answered (or the
    /// stream has opened); rejected and failed runs before that point leave it
    /// untouched.
    pub async fn run(
        &mut self,
        command: CommandType,
        input: PromptInput,
        editor: &mut dyn Editor,
    ) -> Outcome {
        let mut session = Session::new(command);
        let mut queue = VecDeque::from([Action::Open, Action::Submit(input)]);
        let mut services = Services {
            client: self.client,
            transcripts: self.transcripts,
            store: &mut *self.store,
            transcript_lang: &self.transcript_lang,
        };

        while let Some(action) = queue.pop_front() {
            let commands = {
                let ctx = Context {
                    settings: services.store.get(),
                    notifier: self.notifier.as_ref(),
                };
                update::update(&mut session, action, editor, &ctx)
            };

            for command in commands {
                if let Some(next) = execute_command(command, &mut services).await {
                    queue.push_back(next);
                }
            }
        }

        let outcome = session.outcome();
        debug!(%command, ?outcome, "Dispatch finished");
        outcome
    }
}
