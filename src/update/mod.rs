mod generation;
mod helpers;
mod input;
mod streaming;
mod transcript;

use crate::action::Action;
use crate::app::Session;
use crate::command::Command;
use crate::editor::Editor;
use crate::notify::Notifier;
use crate::settings::Settings;

/// Read-only inputs to a single update step
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub notifier: &'a dyn Notifier,
}

pub fn update(
    session: &mut Session,
    action: Action,
    editor: &mut dyn Editor,
    ctx: &Context<'_>,
) -> Vec<Command> {
    match action {
        Action::Open => input::handle_open(session),
        Action::Submit(input) => input::handle_submit(session, input, editor, ctx),
        Action::TranscriptLoaded(result) => {
            transcript::handle_transcript_loaded(session, result, editor, ctx)
        }
        Action::Generated(result) => generation::handle_generated(session, result, editor, ctx),
        Action::StreamOpened(result) => {
            streaming::handle_stream_opened(session, result, editor, ctx)
        }
        Action::ChunkReceived { chunk, stream } => {
            streaming::handle_chunk(session, chunk, stream, editor, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{PromptInput, SessionState};
    use crate::domain::types::{
        CommandType, Provider, TranscriptSegment, VideoDetails, VideoTranscript,
    };
    use crate::editor::{Position, TextBuffer};
    use crate::llm::ChunkStream;
    use crate::notify::MemoryNotifier;

    fn run(
        session: &mut Session,
        actions: Vec<Action>,
        editor: &mut TextBuffer,
        settings: &Settings,
        notifier: &MemoryNotifier,
    ) -> Vec<Command> {
        let ctx = Context { settings, notifier };
        let mut commands = Vec::new();
        for action in actions {
            commands = update(session, action, editor, &ctx);
        }
        commands
    }

    #[test]
    fn empty_request_is_rejected() {
        let mut session = Session::new(CommandType::Cursor);
        let mut editor = TextBuffer::new("abc");
        let notifier = MemoryNotifier::new();
        let commands = run(
            &mut session,
            vec![Action::Open, Action::Submit(PromptInput::new(""))],
            &mut editor,
            &Settings::default(),
            &notifier,
        );
        assert!(commands.is_empty());
        assert_eq!(session.state, SessionState::AwaitingInput);
        assert_eq!(notifier.last().as_deref(), Some("Please enter a prompt"));
    }

    #[test]
    fn youtube_without_link_is_rejected() {
        let mut session = Session::new(CommandType::Youtube);
        let mut editor = TextBuffer::new("");
        let notifier = MemoryNotifier::new();
        let commands = run(
            &mut session,
            vec![Action::Open, Action::Submit(PromptInput::new("summarize"))],
            &mut editor,
            &Settings::default(),
            &notifier,
        );
        assert!(commands.is_empty());
        assert_eq!(session.state, SessionState::AwaitingInput);
        assert_eq!(notifier.last().as_deref(), Some("Please enter a YouTube link"));
    }

    #[test]
    fn youtube_fetches_transcript_before_requesting() {
        let mut session = Session::new(CommandType::Youtube);
        let mut editor = TextBuffer::new("");
        let notifier = MemoryNotifier::new();
        let settings = Settings::default();
        let input = PromptInput::new("summarize").with_link("https://youtu.be/dQw4w9WgXcQ");
        let commands = run(
            &mut session,
            vec![Action::Open, Action::Submit(input)],
            &mut editor,
            &settings,
            &notifier,
        );
        assert_eq!(session.state, SessionState::FetchingAuxiliaryData);
        assert!(matches!(&commands[..], [Command::FetchTranscript { link }] if link == "https://youtu.be/dQw4w9WgXcQ"));

        let video = VideoTranscript {
            details: VideoDetails {
                title: "Never Gonna".into(),
                author: "Rick".into(),
                keywords: vec!["music".into()],
            },
            segments: vec![TranscriptSegment { text: "never gonna give".into() }],
        };
        let ctx = Context { settings: &settings, notifier: &notifier };
        let commands = update(&mut session, Action::TranscriptLoaded(Ok(video)), &mut editor, &ctx);
        assert_eq!(session.state, SessionState::Requesting);
        match &commands[..] {
            [Command::Generate(request)] => {
                assert!(request.prompt.contains("Never Gonna"));
                assert!(request.prompt.contains("never gonna give"));
                assert!(request.prompt.contains("summarize"));
            }
            _ => panic!("expected a generate command"),
        }
    }

    #[test]
    fn ollama_never_streams() {
        let mut settings = Settings::default();
        settings.streaming = true;
        settings.provider = Provider::Ollama;
        let mut session = Session::new(CommandType::Cursor);
        let mut editor = TextBuffer::new("");
        let notifier = MemoryNotifier::new();
        let commands = run(
            &mut session,
            vec![Action::Open, Action::Submit(PromptInput::new("hi"))],
            &mut editor,
            &settings,
            &notifier,
        );
        assert!(matches!(&commands[..], [Command::Generate(request)] if !request.streaming));
    }

    #[test]
    fn stream_chunks_advance_the_cursor() {
        let mut settings = Settings::default();
        settings.streaming = true;
        let mut session = Session::new(CommandType::Cursor);
        let mut editor = TextBuffer::new("ab").with_cursor(Position::new(0, 1));
        let notifier = MemoryNotifier::new();
        run(
            &mut session,
            vec![Action::Open, Action::Submit(PromptInput::new("hi"))],
            &mut editor,
            &settings,
            &notifier,
        );

        let ctx = Context { settings: &settings, notifier: &notifier };
        let stream = ChunkStream::from_chunks(Vec::<String>::new());
        let commands = update(&mut session, Action::StreamOpened(Ok(Some(stream))), &mut editor, &ctx);
        let Some(Command::PullChunk(stream)) = commands.into_iter().next() else {
            panic!("expected a pull");
        };

        let commands = update(
            &mut session,
            Action::ChunkReceived { chunk: Some(Ok("X\nY".into())), stream },
            &mut editor,
            &ctx,
        );
        assert_eq!(editor.text(), "aX\nYb");
        assert_eq!(editor.get_cursor(), Position::new(1, 1));
        let Some(Command::PullChunk(stream)) = commands.into_iter().next() else {
            panic!("expected a pull");
        };

        let commands = update(
            &mut session,
            Action::ChunkReceived { chunk: None, stream },
            &mut editor,
            &ctx,
        );
        assert_eq!(session.state, SessionState::Succeeded);
        assert_eq!(notifier.last().as_deref(), Some("Action complete!"));
        assert!(matches!(&commands[..], [Command::RecordRecentPrompt(p)] if p == "hi"));
    }

    #[test]
    fn stream_error_stops_writing() {
        let mut settings = Settings::default();
        settings.streaming = true;
        let mut session = Session::new(CommandType::Cursor);
        let mut editor = TextBuffer::new("");
        let notifier = MemoryNotifier::new();
        run(
            &mut session,
            vec![Action::Open, Action::Submit(PromptInput::new("hi"))],
            &mut editor,
            &settings,
            &notifier,
        );

        let ctx = Context { settings: &settings, notifier: &notifier };
        let stream = ChunkStream::from_chunks(Vec::<String>::new());
        update(&mut session, Action::StreamOpened(Ok(Some(stream))), &mut editor, &ctx);
        let stream = ChunkStream::from_chunks(Vec::<String>::new());
        let commands = update(
            &mut session,
            Action::ChunkReceived { chunk: Some(Err("connection reset".into())), stream },
            &mut editor,
            &ctx,
        );
        assert!(commands.is_empty());
        assert_eq!(
            session.state,
            SessionState::Failed("Error generating content: connection reset".into())
        );
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn late_results_are_ignored() {
        let mut session = Session::new(CommandType::Selection);
        let mut editor = TextBuffer::new("abc");
        let notifier = MemoryNotifier::new();
        let settings = Settings::default();
        let ctx = Context { settings: &settings, notifier: &notifier };
        let commands = update(&mut session, Action::Generated(Ok("zzz".into())), &mut editor, &ctx);
        assert!(commands.is_empty());
        assert_eq!(editor.text(), "abc");
        assert_eq!(session.state, SessionState::Idle);
    }

    #[test]
    fn provider_without_streaming_fails_with_notice() {
        let mut settings = Settings::default();
        settings.streaming = true;
        let mut session = Session::new(CommandType::Selection);
        let mut editor =
            TextBuffer::new("keep this").with_selection(Position::new(0, 0), Position::new(0, 4));
        let notifier = MemoryNotifier::new();
        run(
            &mut session,
            vec![Action::Open, Action::Submit(PromptInput::new("shout"))],
            &mut editor,
            &settings,
            &notifier,
        );
        assert!(session.is_streaming());

        let ctx = Context { settings: &settings, notifier: &notifier };
        let commands = update(&mut session, Action::StreamOpened(Ok(None)), &mut editor, &ctx);

        let notice = "Streaming is not supported for Ollama at this time.";
        assert!(commands.is_empty());
        assert_eq!(session.state, SessionState::Failed(notice.into()));
        assert_eq!(notifier.last().as_deref(), Some(notice));
        assert_eq!(editor.text(), "keep this");
        assert_eq!(editor.get_selection(), "keep");
    }
}
