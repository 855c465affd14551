use tracing::{debug, info};

use crate::app::{Session, SessionState};
use crate::command::Command;
use crate::domain::types::CommandType;
use crate::editor::{Editor, Position};
use crate::llm::ChunkStream;

use super::{Context, helpers};

const OLLAMA_STREAMING: &str = "Streaming is not supported for Ollama at this time.";

pub fn handle_stream_opened(
    session: &mut Session,
    result: Result<Option<ChunkStream>, String>,
    editor: &mut dyn Editor,
    ctx: &Context<'_>,
) -> Vec<Command> {
    if !session.is_streaming() {
        debug!(state = ?session.state, "Ignoring stream");
        return Vec::new();
    }

    match result {
        Ok(Some(stream)) => {
            session.insert_at = clear_target(session, editor);
            vec![Command::PullChunk(stream)]
        }
        Ok(None) => helpers::fail(session, ctx, OLLAMA_STREAMING.to_string()),
        Err(err) => helpers::generation_failed(session, ctx, &err),
    }
}

/// Empty the region the stream will write into; returns the first insertion point
fn clear_target(session: &Session, editor: &mut dyn Editor) -> Position {
    match session.command {
        CommandType::Selection => {
            editor.replace_selection("");
            editor.get_cursor()
        }
        CommandType::Document => {
            editor.set_value("");
            editor.set_cursor(Position::ZERO);
            Position::ZERO
        }
        CommandType::Cursor | CommandType::Youtube => session.anchor,
    }
}

pub fn handle_chunk(
    session: &mut Session,
    chunk: Option<Result<String, String>>,
    stream: ChunkStream,
    editor: &mut dyn Editor,
    ctx: &Context<'_>,
) -> Vec<Command> {
    if !session.is_streaming() {
        debug!(state = ?session.state, "Dropping stream");
        return Vec::new();
    }

    match chunk {
        Some(Ok(text)) => {
            let at = session.insert_at;
            editor.replace_range(&text, at, at);
            let end = at.advance(&text);
            editor.set_cursor(end);
            session.insert_at = end;
            session.chunks_received += 1;
            vec![Command::PullChunk(stream)]
        }
        Some(Err(err)) => helpers::generation_failed(session, ctx, &err),
        None => {
            info!(command = %session.command, chunks = session.chunks_received, "Stream finished");
            ctx.notifier.notice("Action complete!");
            session.state = SessionState::Succeeded;
            vec![Command::RecordRecentPrompt(session.request.clone())]
        }
    }
}
