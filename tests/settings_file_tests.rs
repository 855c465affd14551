use std::fs;
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::tempdir;

use simple_prompt::domain::prompt::default_template;
use simple_prompt::{CommandType, JsonFileStore, MemoryNotifier, Provider, SettingsStore};

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read settings")).expect("valid json")
}

#[test]
fn missing_file_starts_from_defaults_without_writing() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("settings.json");
    let notifier = Arc::new(MemoryNotifier::new());

    let store = SettingsStore::load(Box::new(JsonFileStore::new(&path)), notifier.clone())
        .expect("load");

    assert_eq!(store.get().provider, Provider::OpenAi);
    assert_eq!(store.get().template(CommandType::Cursor), default_template(CommandType::Cursor));
    assert!(!path.exists());
    assert!(notifier.notices().is_empty());
}

#[test]
fn changes_are_written_and_survive_a_reload() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config").join("settings.json");
    let notifier = Arc::new(MemoryNotifier::new());

    {
        let mut store = SettingsStore::load(Box::new(JsonFileStore::new(&path)), notifier.clone())
            .expect("load");
        store.set_api_key("sk-live").expect("api key");
        store.set_streaming(true).expect("streaming");
        store.set_recents_limit(3).expect("limit");
        for prompt in ["a", "b", "c", "d"] {
            store.record_recent_prompt(prompt).expect("recent");
        }
    }

    let saved = read_json(&path);
    assert_eq!(saved["settingsVersion"], 2);
    assert_eq!(saved["apiKey"]["openai"], "sk-live");
    assert_eq!(saved["streaming"], true);
    assert_eq!(saved["recentsLimit"], 3);
    assert_eq!(saved["recentPrompts"], json!(["d", "c", "b"]));

    let store = SettingsStore::load(Box::new(JsonFileStore::new(&path)), notifier.clone())
        .expect("reload");
    assert_eq!(store.get().api_key.openai.as_deref(), Some("sk-live"));
    assert!(store.get().streaming);
    assert_eq!(store.get().recents.entries(), ["d", "c", "b"]);
}

#[test]
fn partial_file_is_merged_over_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{"settingsVersion": 2, "provider": "ollama", "recentPrompts": ["x", "x", ""]}"#,
    )
    .expect("seed");
    let notifier = Arc::new(MemoryNotifier::new());

    let store = SettingsStore::load(Box::new(JsonFileStore::new(&path)), notifier.clone())
        .expect("load");

    assert_eq!(store.get().provider, Provider::Ollama);
    assert_eq!(store.get().recents.entries(), ["x"]);
    assert!(store.get().recent_prompts_enabled);
    assert_eq!(
        store.get().template(CommandType::Document),
        default_template(CommandType::Document)
    );
    assert!(notifier.notices().is_empty());
}

#[test]
fn old_version_is_reset_and_rewritten() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"settingsVersion": 1, "provider": "ollama"}"#).expect("seed");
    let notifier = Arc::new(MemoryNotifier::new());

    let store = SettingsStore::load(Box::new(JsonFileStore::new(&path)), notifier.clone())
        .expect("load");

    assert_eq!(store.get().provider, Provider::OpenAi);
    assert_eq!(
        notifier.last().as_deref(),
        Some("Settings were reset to defaults. Please reconfigure the plugin.")
    );
    assert_eq!(read_json(&path)["settingsVersion"], 2);
}

#[test]
fn unreadable_json_is_reset() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").expect("seed");
    let notifier = Arc::new(MemoryNotifier::new());

    let store = SettingsStore::load(Box::new(JsonFileStore::new(&path)), notifier.clone())
        .expect("load");

    assert_eq!(store.get().provider, Provider::OpenAi);
    assert_eq!(notifier.notices().len(), 1);
    assert_eq!(read_json(&path)["provider"], "openai");
}

#[test]
fn rejected_template_leaves_the_file_alone() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    let notifier = Arc::new(MemoryNotifier::new());
    let mut store = SettingsStore::load(Box::new(JsonFileStore::new(&path)), notifier.clone())
        .expect("load");
    store.set_recents_enabled(false).expect("toggle");
    let before = fs::read_to_string(&path).expect("read");

    let err = store
        .set_template(CommandType::Cursor, "no placeholder here")
        .unwrap_err();

    assert!(err.is_rejected());
    assert_eq!(fs::read_to_string(&path).expect("read"), before);
    assert_eq!(
        notifier.last().as_deref(),
        Some("Cursor prompt template must include <QUERY>")
    );
}
