use std::path::PathBuf;

use directories::ProjectDirs;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_TRANSCRIPT_LANG: &str = "en";
const SETTINGS_FILE: &str = "settings.json";

/// Process configuration read from the environment (and `.env`).
///
/// | Variable                 | Default                      |
/// |--------------------------|------------------------------|
/// | `OPENAI_BASE_URL`        | `https://api.openai.com`     |
/// | `OPENAI_API_KEY`         | unset; stored key wins       |
/// | `OLLAMA_BASE_URL`        | `http://localhost:11434`     |
/// | `SPROMPT_TRANSCRIPT_URL` | unset (youtube disabled)     |
/// | `SPROMPT_TRANSCRIPT_LANG`| `en`                         |
/// | `SPROMPT_SETTINGS`       | platform config dir          |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_base_url: String,
    pub openai_api_key: Option<String>,
    pub ollama_base_url: String,
    pub transcript_url: Option<String>,
    pub transcript_lang: String,
    pub settings_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_api_key: None,
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            transcript_url: None,
            transcript_lang: DEFAULT_TRANSCRIPT_LANG.to_string(),
            settings_path: default_settings_path(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_base_url: env_or("OPENAI_BASE_URL", defaults.openai_base_url),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            ollama_base_url: env_or("OLLAMA_BASE_URL", defaults.ollama_base_url),
            transcript_url: env_opt("SPROMPT_TRANSCRIPT_URL"),
            transcript_lang: env_or("SPROMPT_TRANSCRIPT_LANG", defaults.transcript_lang),
            settings_path: env_opt("SPROMPT_SETTINGS")
                .map(PathBuf::from)
                .unwrap_or(defaults.settings_path),
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: String) -> String {
    env_opt(key).unwrap_or(default)
}

fn default_settings_path() -> PathBuf {
    ProjectDirs::from("", "", "simple-prompt")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
        .unwrap_or_else(|| PathBuf::from(".sprompt-settings.json"))
}
