use tracing::debug;

use crate::app::{PromptInput, Session, SessionState};
use crate::command::Command;
use crate::domain::types::CommandType;
use crate::editor::Editor;

use super::{Context, helpers};

pub fn handle_open(session: &mut Session) -> Vec<Command> {
    if session.state == SessionState::Idle {
        session.state = SessionState::AwaitingInput;
    }
    Vec::new()
}

pub fn handle_submit(
    session: &mut Session,
    input: PromptInput,
    editor: &mut dyn Editor,
    ctx: &Context<'_>,
) -> Vec<Command> {
    if session.state != SessionState::AwaitingInput {
        debug!(state = ?session.state, "Ignoring submit");
        return Vec::new();
    }

    if input.request.is_empty() {
        ctx.notifier.notice("Please enter a prompt");
        return Vec::new();
    }

    let link = input.link.filter(|link| !link.trim().is_empty());
    if session.command == CommandType::Youtube && link.is_none() {
        ctx.notifier.notice("Please enter a YouTube link");
        return Vec::new();
    }

    session.request = input.request;
    session.anchor = editor.get_cursor();

    match link {
        Some(link) if session.command == CommandType::Youtube => {
            session.state = SessionState::FetchingAuxiliaryData;
            vec![Command::FetchTranscript { link }]
        }
        _ => helpers::start_request(session, editor, ctx, None),
    }
}
