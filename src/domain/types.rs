use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Generation mode chosen by the invoked command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Selection,
    Cursor,
    Document,
    Youtube,
}

impl CommandType {
    pub const ALL: [CommandType; 4] = [
        CommandType::Selection,
        CommandType::Cursor,
        CommandType::Document,
        CommandType::Youtube,
    ];

    /// Stable identifier used when registering the command with a host
    pub fn id(&self) -> &'static str {
        match self {
            CommandType::Selection => "prompt-generate-content-from-selection",
            CommandType::Cursor => "prompt-generate-content-at-cursor",
            CommandType::Document => "prompt-rewrite-document",
            CommandType::Youtube => "prompt-generate-from-youtube-transcript",
        }
    }

    /// Display name of the command
    pub fn title(&self) -> &'static str {
        match self {
            CommandType::Selection => "Rewrite selection",
            CommandType::Cursor => "Generate content at cursor",
            CommandType::Document => "Rewrite document",
            CommandType::Youtube => "Generate from YouTube transcript",
        }
    }

    /// Hint shown above the request input
    pub fn subtitle(&self) -> &'static str {
        match self {
            CommandType::Selection => {
                "Write your prompt to rewrite the selected text. Ex. 'Add more options', 'summarize the text', etc."
            }
            CommandType::Cursor => {
                "Give request to generate content at the cursor. Ex. 'Write a joke', 'Explain the concept of ...', etc."
            }
            CommandType::Document => {
                "Write you request to rewrite the entire document. Ex. 'Structure the document better', 'Add more examples', etc."
            }
            CommandType::Youtube => {
                "Paste a YouTube link and a request. Ex. 'Summarize the video', 'List the key takeaways', etc."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Selection => "selection",
            CommandType::Cursor => "cursor",
            CommandType::Document => "document",
            CommandType::Youtube => "youtube",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown command type '{s}'"))
    }
}

/// LLM backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Ollama,
}

impl Provider {
    pub fn supports_streaming(&self) -> bool {
        matches!(self, Provider::OpenAi)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "ollama" => Ok(Provider::Ollama),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenAiModel {
    #[default]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
}

impl OpenAiModel {
    pub const ALL: [OpenAiModel; 3] = [
        OpenAiModel::Gpt35Turbo,
        OpenAiModel::Gpt4Turbo,
        OpenAiModel::Gpt4o,
    ];

    /// Model identifier sent on the wire
    pub fn id(&self) -> &'static str {
        match self {
            OpenAiModel::Gpt35Turbo => "gpt-3.5-turbo",
            OpenAiModel::Gpt4Turbo => "gpt-4-turbo",
            OpenAiModel::Gpt4o => "gpt-4o",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OpenAiModel::Gpt35Turbo => "GPT-3.5 Turbo",
            OpenAiModel::Gpt4Turbo => "GPT-4 Turbo",
            OpenAiModel::Gpt4o => "GPT-4 Omni",
        }
    }
}

impl FromStr for OpenAiModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpenAiModel::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| format!("unknown OpenAI model '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OllamaModel {
    #[default]
    #[serde(rename = "llama3")]
    Llama3,
    #[serde(rename = "llama3.1")]
    Llama31,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "gemma2")]
    Gemma2,
    #[serde(rename = "phi3")]
    Phi3,
}

impl OllamaModel {
    pub const ALL: [OllamaModel; 5] = [
        OllamaModel::Llama3,
        OllamaModel::Llama31,
        OllamaModel::Mistral,
        OllamaModel::Gemma2,
        OllamaModel::Phi3,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            OllamaModel::Llama3 => "llama3",
            OllamaModel::Llama31 => "llama3.1",
            OllamaModel::Mistral => "mistral",
            OllamaModel::Gemma2 => "gemma2",
            OllamaModel::Phi3 => "phi3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OllamaModel::Llama3 => "Llama 3",
            OllamaModel::Llama31 => "Llama 3.1",
            OllamaModel::Mistral => "Mistral",
            OllamaModel::Gemma2 => "Gemma 2",
            OllamaModel::Phi3 => "Phi-3",
        }
    }
}

impl FromStr for OllamaModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OllamaModel::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| format!("unknown Ollama model '{s}'"))
    }
}

/// One generation handed to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub command: CommandType,
    pub prompt: String,
    pub streaming: bool,
}

/// Metadata and transcript of a YouTube video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTranscript {
    #[serde(rename = "videoDetails")]
    pub details: VideoDetails,
    #[serde(rename = "transcript", default)]
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
}

impl VideoTranscript {
    /// Full transcript as a single line of text
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn keywords(&self) -> String {
        self.details.keywords.join(", ")
    }
}
