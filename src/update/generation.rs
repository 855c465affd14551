use tracing::{debug, info};

use crate::app::{Session, SessionState};
use crate::command::Command;
use crate::domain::types::CommandType;
use crate::editor::Editor;

use super::{Context, helpers};

pub fn handle_generated(
    session: &mut Session,
    result: Result<String, String>,
    editor: &mut dyn Editor,
    ctx: &Context<'_>,
) -> Vec<Command> {
    if session.state != SessionState::Requesting || session.streaming {
        debug!(state = ?session.state, "Ignoring generated text");
        return Vec::new();
    }

    match result {
        Ok(text) => {
            apply(session, editor, &text);
            session.state = SessionState::Succeeded;
            info!(command = %session.command, len = text.len(), "Generation applied");
            vec![Command::RecordRecentPrompt(session.request.clone())]
        }
        Err(err) => helpers::generation_failed(session, ctx, &err),
    }
}

fn apply(session: &Session, editor: &mut dyn Editor, text: &str) {
    match session.command {
        CommandType::Selection => editor.replace_selection(text),
        CommandType::Document => editor.set_value(text),
        CommandType::Cursor | CommandType::Youtube => {
            editor.replace_range(text, session.anchor, session.anchor)
        }
    }
}
