use tracing::{error, info};

use crate::app::{Session, SessionState};
use crate::command::Command;
use crate::domain::prompt::{PromptContext, build_prompt};
use crate::domain::types::{CommandType, GenerationRequest, VideoTranscript};
use crate::editor::Editor;
use crate::settings::Settings;

use super::Context;

/// Fill the command's template and move to `Requesting`
pub fn start_request(
    session: &mut Session,
    editor: &dyn Editor,
    ctx: &Context<'_>,
    video: Option<&VideoTranscript>,
) -> Vec<Command> {
    let Some(prompt) = prompt_for(session, editor, ctx.settings, video) else {
        return fail(session, ctx, "Missing video transcript".to_string());
    };

    let streaming = ctx.settings.streaming_enabled();
    session.streaming = streaming;
    session.state = SessionState::Requesting;
    info!(command = %session.command, streaming, "Requesting generation");

    vec![Command::Generate(GenerationRequest {
        command: session.command,
        prompt,
        streaming,
    })]
}

fn prompt_for(
    session: &Session,
    editor: &dyn Editor,
    settings: &Settings,
    video: Option<&VideoTranscript>,
) -> Option<String> {
    let template = settings.template(session.command);
    let request = session.request.as_str();

    let prompt = match session.command {
        CommandType::Selection => {
            let selection = editor.get_selection();
            build_prompt(
                template,
                &PromptContext::Selection {
                    selection: &selection,
                    request,
                },
            )
        }
        CommandType::Cursor => build_prompt(template, &PromptContext::Cursor { query: request }),
        CommandType::Document => {
            let document = editor.get_value();
            build_prompt(
                template,
                &PromptContext::Document {
                    document: &document,
                    request,
                },
            )
        }
        CommandType::Youtube => build_prompt(
            template,
            &PromptContext::Youtube {
                video: video?,
                request,
            },
        ),
    };
    Some(prompt)
}

pub fn fail(session: &mut Session, ctx: &Context<'_>, message: String) -> Vec<Command> {
    error!(command = %session.command, "{message}");
    ctx.notifier.notice(&message);
    session.state = SessionState::Failed(message);
    Vec::new()
}

pub fn generation_failed(session: &mut Session, ctx: &Context<'_>, err: &str) -> Vec<Command> {
    fail(session, ctx, format!("Error generating content: {err}"))
}
