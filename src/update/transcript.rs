use tracing::debug;

use crate::app::{Session, SessionState};
use crate::command::Command;
use crate::domain::types::VideoTranscript;
use crate::editor::Editor;

use super::{Context, helpers};

pub fn handle_transcript_loaded(
    session: &mut Session,
    result: Result<VideoTranscript, String>,
    editor: &mut dyn Editor,
    ctx: &Context<'_>,
) -> Vec<Command> {
    if session.state != SessionState::FetchingAuxiliaryData {
        debug!(state = ?session.state, "Ignoring transcript");
        return Vec::new();
    }

    match result {
        Ok(video) => {
            debug!(title = %video.details.title, segments = video.segments.len(), "Transcript loaded");
            helpers::start_request(session, editor, ctx, Some(&video))
        }
        Err(err) => helpers::fail(session, ctx, format!("Error fetching transcript: {err}")),
    }
}
