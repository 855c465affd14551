//! Versioned plugin settings and the store that owns them.
//!
//! Settings are persisted as one JSON object with camelCase keys. Loaded
//! data is merged over the defaults key by key; data written by a different
//! settings version is thrown away.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::prompt::default_template;
use crate::domain::recents::RecentPrompts;
use crate::domain::template;
use crate::domain::types::{CommandType, OllamaModel, OpenAiModel, Provider};
use crate::error::SettingsError;
use crate::notify::Notifier;

pub const SETTINGS_VERSION: u64 = 2;

const RESET_NOTICE: &str = "Settings were reset to defaults. Please reconfigure the plugin.";
const STREAMING_UNSUPPORTED: &str = "Streaming is not supported for Ollama at this time.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub settings_version: u64,
    pub provider: Provider,
    pub api_key: ApiKeys,
    pub model: Models,
    pub prompt_templates: PromptTemplates,
    pub streaming: bool,
    #[serde(flatten)]
    pub recents: RecentPrompts,
    pub recent_prompts_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            settings_version: SETTINGS_VERSION,
            provider: Provider::default(),
            api_key: ApiKeys::default(),
            model: Models::default(),
            prompt_templates: PromptTemplates::default(),
            streaming: false,
            recents: RecentPrompts::default(),
            recent_prompts_enabled: true,
        }
    }
}

impl Settings {
    /// Streaming is used only when enabled and the provider can stream
    pub fn streaming_enabled(&self) -> bool {
        self.streaming && self.provider.supports_streaming()
    }

    pub fn template(&self, command: CommandType) -> &str {
        self.prompt_templates.get(command)
    }

    /// Build settings from persisted data, or `None` when it must be discarded
    fn from_persisted(data: Value) -> Option<Settings> {
        let Value::Object(loaded) = data else {
            warn!("Persisted settings are not a JSON object");
            return None;
        };

        let version = loaded.get("settingsVersion").and_then(Value::as_u64);
        if version != Some(SETTINGS_VERSION) {
            info!(
                found = ?version,
                expected = SETTINGS_VERSION,
                "Settings version mismatch"
            );
            return None;
        }

        let Ok(Value::Object(mut merged)) = serde_json::to_value(Settings::default()) else {
            return None;
        };
        for (key, value) in loaded {
            merged.insert(key, value);
        }

        match serde_json::from_value::<Settings>(Value::Object(merged)) {
            Ok(mut settings) => {
                settings.recents.normalize();
                if !settings.provider.supports_streaming() {
                    settings.streaming = false;
                }
                Some(settings)
            }
            Err(e) => {
                warn!("Persisted settings are invalid: {e}");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    pub openai: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Models {
    pub openai: OpenAiModel,
    pub ollama: OllamaModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    pub selection: String,
    pub cursor: String,
    pub document: String,
    pub youtube: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            selection: default_template(CommandType::Selection).to_string(),
            cursor: default_template(CommandType::Cursor).to_string(),
            document: default_template(CommandType::Document).to_string(),
            youtube: default_template(CommandType::Youtube).to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn get(&self, command: CommandType) -> &str {
        match command {
            CommandType::Selection => &self.selection,
            CommandType::Cursor => &self.cursor,
            CommandType::Document => &self.document,
            CommandType::Youtube => &self.youtube,
        }
    }

    fn get_mut(&mut self, command: CommandType) -> &mut String {
        match command {
            CommandType::Selection => &mut self.selection,
            CommandType::Cursor => &mut self.cursor,
            CommandType::Document => &mut self.document,
            CommandType::Youtube => &mut self.youtube,
        }
    }
}

/// Where settings live between runs
pub trait SettingsPersistence: Send + Sync {
    fn load(&self) -> Result<Option<Value>, SettingsError>;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Settings stored as pretty-printed JSON on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsPersistence for JsonFileStore {
    fn load(&self) -> Result<Option<Value>, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

/// In-memory persistence, mostly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Value) -> Self {
        Self {
            data: Mutex::new(Some(data)),
        }
    }

    /// Last value written by `save`, or the seeded data
    pub fn data(&self) -> Option<Value> {
        self.data.lock().ok().and_then(|d| d.clone())
    }
}

impl SettingsPersistence for MemoryStore {
    fn load(&self) -> Result<Option<Value>, SettingsError> {
        Ok(self.data())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let value = serde_json::to_value(settings)?;
        if let Ok(mut data) = self.data.lock() {
            *data = Some(value);
        }
        Ok(())
    }
}

impl<T: SettingsPersistence + ?Sized> SettingsPersistence for Arc<T> {
    fn load(&self) -> Result<Option<Value>, SettingsError> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        (**self).save(settings)
    }
}

/// Owns the process-wide settings value.
///
/// Every change is persisted and published to subscribers. Rejected changes
/// leave the settings untouched and raise a notice.
pub struct SettingsStore {
    settings: Settings,
    persistence: Box<dyn SettingsPersistence>,
    notifier: Arc<dyn Notifier>,
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    pub fn load(
        persistence: Box<dyn SettingsPersistence>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SettingsError> {
        let loaded = match persistence.load() {
            Ok(data) => data,
            Err(SettingsError::Json(e)) => {
                warn!("Discarding unreadable settings: {e}");
                Some(Value::Null)
            }
            Err(e) => return Err(e),
        };

        let (settings, reset) = match loaded {
            None => (Settings::default(), false),
            Some(data) => match Settings::from_persisted(data) {
                Some(settings) => (settings, false),
                None => (Settings::default(), true),
            },
        };

        let (tx, _rx) = watch::channel(settings.clone());
        let store = Self {
            settings,
            persistence,
            notifier,
            tx,
        };

        if reset {
            store.notifier.notice(RESET_NOTICE);
            store.persistence.save(&store.settings)?;
        }

        Ok(store)
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }

    /// Apply `change`, persist, and publish the result
    pub fn set(&mut self, change: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        change(&mut self.settings);
        self.tx.send_replace(self.settings.clone());
        self.persistence.save(&self.settings)
    }

    fn reject(&self, message: impl Into<String>) -> SettingsError {
        let message = message.into();
        warn!("{message}");
        self.notifier.notice(&message);
        SettingsError::rejected(message)
    }

    pub fn set_api_key(&mut self, key: &str) -> Result<(), SettingsError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(self.reject("API key cannot be empty"));
        }
        self.set(|s| s.api_key.openai = Some(key.to_string()))?;
        self.notifier.notice("API key set successfully");
        Ok(())
    }

    /// Switching to a provider that cannot stream turns streaming off
    pub fn set_provider(&mut self, provider: Provider) -> Result<(), SettingsError> {
        self.set(|s| {
            s.provider = provider;
            if !provider.supports_streaming() {
                s.streaming = false;
            }
        })
    }

    pub fn set_openai_model(&mut self, model: OpenAiModel) -> Result<(), SettingsError> {
        self.set(|s| s.model.openai = model)
    }

    pub fn set_ollama_model(&mut self, model: OllamaModel) -> Result<(), SettingsError> {
        self.set(|s| s.model.ollama = model)
    }

    pub fn set_streaming(&mut self, enabled: bool) -> Result<(), SettingsError> {
        if enabled && !self.settings.provider.supports_streaming() {
            return Err(self.reject(STREAMING_UNSUPPORTED));
        }
        self.set(|s| s.streaming = enabled)
    }

    pub fn toggle_streaming(&mut self) -> Result<bool, SettingsError> {
        let enabled = !self.settings.streaming;
        self.set_streaming(enabled)?;
        Ok(enabled)
    }

    pub fn set_recents_limit(&mut self, limit: usize) -> Result<(), SettingsError> {
        self.set(|s| s.recents.set_limit(limit))
    }

    pub fn set_recents_enabled(&mut self, enabled: bool) -> Result<(), SettingsError> {
        self.set(|s| s.recent_prompts_enabled = enabled)
    }

    pub fn toggle_recents(&mut self) -> Result<bool, SettingsError> {
        let enabled = !self.settings.recent_prompts_enabled;
        self.set_recents_enabled(enabled)?;
        Ok(enabled)
    }

    /// Replace the template for `command` after checking its placeholders
    pub fn set_template(&mut self, command: CommandType, text: &str) -> Result<(), SettingsError> {
        if let Err(e) = template::validate(command, text) {
            warn!("{e}");
            self.notifier.notice(&e.to_string());
            return Err(e.into());
        }
        self.set(|s| *s.prompt_templates.get_mut(command) = text.to_string())?;
        self.notifier.notice("Template successfully changed!");
        Ok(())
    }

    pub fn reset_template(&mut self, command: CommandType) -> Result<(), SettingsError> {
        self.set(|s| *s.prompt_templates.get_mut(command) = default_template(command).to_string())?;
        self.notifier.notice("Template successfully reset!");
        Ok(())
    }

    pub fn record_recent_prompt(&mut self, prompt: &str) -> Result<(), SettingsError> {
        if prompt.is_empty() {
            return Ok(());
        }
        self.set(|s| s.recents.push(prompt))
    }
}
