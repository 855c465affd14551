use super::template::{Placeholder, fill};
use super::types::{CommandType, VideoTranscript};

/// Run-time values a command feeds into its template
#[derive(Debug, Clone, Copy)]
pub enum PromptContext<'a> {
    Selection { selection: &'a str, request: &'a str },
    Cursor { query: &'a str },
    Document { document: &'a str, request: &'a str },
    Youtube { video: &'a VideoTranscript, request: &'a str },
}

impl PromptContext<'_> {
    pub fn command(&self) -> CommandType {
        match self {
            PromptContext::Selection { .. } => CommandType::Selection,
            PromptContext::Cursor { .. } => CommandType::Cursor,
            PromptContext::Document { .. } => CommandType::Document,
            PromptContext::Youtube { .. } => CommandType::Youtube,
        }
    }
}

pub fn build_prompt(template: &str, context: &PromptContext<'_>) -> String {
    match *context {
        PromptContext::Selection { selection, request } => fill(
            template,
            &[
                (Placeholder::Selection, selection),
                (Placeholder::Request, request),
            ],
        ),
        PromptContext::Cursor { query } => fill(template, &[(Placeholder::Query, query)]),
        PromptContext::Document { document, request } => fill(
            template,
            &[
                (Placeholder::Document, document),
                (Placeholder::Request, request),
            ],
        ),
        PromptContext::Youtube { video, request } => {
            let keywords = video.keywords();
            let transcript = video.text();
            fill(
                template,
                &[
                    (Placeholder::Title, video.details.title.as_str()),
                    (Placeholder::Author, video.details.author.as_str()),
                    (Placeholder::Keywords, keywords.as_str()),
                    (Placeholder::Transcript, transcript.as_str()),
                    (Placeholder::Request, request),
                ],
            )
        }
    }
}

pub fn default_template(command: CommandType) -> &'static str {
    match command {
        CommandType::Selection => SELECTION_TEMPLATE,
        CommandType::Cursor => CURSOR_TEMPLATE,
        CommandType::Document => DOCUMENT_TEMPLATE,
        CommandType::Youtube => YOUTUBE_TEMPLATE,
    }
}

const CURSOR_TEMPLATE: &str = r#"
You are a helpful AI assistant that can, given a piece of text and a request generate an answer using markdown.
Include headers, lists, checkboxes, and other markdown elements in your answer when it makes sense.

====================================
Examples:

Request:
==================
Generate a shopping list with items for Spaghetti Carbonara
==================
Answer:
# Shopping list

- [ ] Pasta
- [ ] Eggs
- [ ] Parmesan cheese
- [ ] Pancetta
====================================

Request:
==================
Give me a good knock-knock joke
==================
Answer:
Knock, knock. Who's there? Lettuce. Lettuce who? Lettuce in, it's cold out here!
====================================

Request:
==================
<QUERY>
==================
Answer:"#;

const SELECTION_TEMPLATE: &str = r#"
You are a helpful AI assistant that can, given a piece of text and a request generate an answer using markdown.
====================================
Example:

Text:
==================
# TODO list
- Find out what is the capital of France?
==================
Request:
==================
Add 2 more items to the list with other questions about France
==================
Answer:
# TODO list
- Find out what is the capital of France?
- Find out what is the population of France?
- Find out what is the area of France?
====================================

Text:
==================
<SELECTION>
==================
Request:
==================
<REQUEST>
==================
Answer:"#;

const DOCUMENT_TEMPLATE: &str = r#"
You are a helpful AI assistant who is an expert in rewriting text. Given a markdown document and a request, you can generate a new version of the document.

====================================
Example:

Document:
==================
# TODO list
- Find out what is the capital of France?
==================
Request:
==================
Add 2 more items to the list with other questions about France
==================
Answer:
# TODO list
- Find out what is the capital of France?
- Find out what is the population of France?
- Find out what is the area of France?
====================================

Document:
==================
<DOCUMENT>
==================
Request:
==================
<REQUEST>
==================
Answer:"#;

const YOUTUBE_TEMPLATE: &str = r#"
You are a helpful AI assistant that works with the transcript of a YouTube video. Given the video details, its transcript and a request, generate an answer using markdown.
Include headers, lists, and other markdown elements in your answer when it makes sense.

====================================
Video title:
==================
<TITLE>
==================
Author:
==================
<AUTHOR>
==================
Keywords:
==================
<KEYWORDS>
==================
Transcript:
==================
<TRANSCRIPT>
==================
Request:
==================
<REQUEST>
==================
Answer:"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::validate;
    use crate::domain::types::{TranscriptSegment, VideoDetails};

    #[test]
    fn default_templates_are_valid() {
        for command in CommandType::ALL {
            assert!(validate(command, default_template(command)).is_ok(), "{command}");
        }
    }

    #[test]
    fn builds_selection_prompt() {
        let context = PromptContext::Selection {
            selection: "World",
            request: "capitalize",
        };
        assert_eq!(build_prompt("<SELECTION>|<REQUEST>", &context), "World|capitalize");
        assert_eq!(context.command(), CommandType::Selection);
    }

    #[test]
    fn builds_youtube_prompt() {
        let video = VideoTranscript {
            details: VideoDetails {
                title: "Ownership".into(),
                author: "Ferris".into(),
                keywords: vec!["rust".into(), "borrowing".into()],
            },
            segments: vec![
                TranscriptSegment { text: "Every value".into() },
                TranscriptSegment { text: "has an owner".into() },
            ],
        };
        let context = PromptContext::Youtube {
            video: &video,
            request: "summarize",
        };
        let prompt = build_prompt("<TITLE>/<AUTHOR>/<KEYWORDS>/<TRANSCRIPT>/<REQUEST>", &context);
        assert_eq!(
            prompt,
            "Ownership/Ferris/rust, borrowing/Every value has an owner/summarize"
        );
    }
}
