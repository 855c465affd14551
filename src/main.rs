use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use simple_prompt::domain::types::{OllamaModel, OpenAiModel};
use simple_prompt::error::SettingsError;
use simple_prompt::{
    AppConfig, Backend, CommandType, ConsoleNotifier, Dispatcher, HttpTranscriptSource,
    JsonFileStore, Notifier, Outcome, Position, PromptInput, Provider, Settings, SettingsStore,
    TextBuffer,
};

const API_KEY_NOTICE: &str = "Please enter your API key in the settings";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser)]
#[command(name = "sprompt")]
#[command(about = "Simple Prompt - fill prompt templates and write LLM answers into your notes")]
struct Cli {
    /// Settings file (defaults to SPROMPT_SETTINGS or the platform config dir)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the selected range with the answer
    Selection {
        #[arg(long)]
        file: PathBuf,
        /// Selection start, LINE:CH (zero-based)
        #[arg(long)]
        from: Position,
        /// Selection end, LINE:CH (zero-based)
        #[arg(long)]
        to: Position,
        #[arg(required = true)]
        request: Vec<String>,
    },
    /// Insert the answer at a position
    Cursor {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "0:0")]
        at: Position,
        #[arg(required = true)]
        request: Vec<String>,
    },
    /// Replace the whole document with the answer
    Document {
        #[arg(long)]
        file: PathBuf,
        #[arg(required = true)]
        request: Vec<String>,
    },
    /// Ask about a YouTube video and insert the answer
    Youtube {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "0:0")]
        at: Position,
        #[arg(long)]
        link: String,
        /// Transcript language (defaults to SPROMPT_TRANSCRIPT_LANG or "en")
        #[arg(long)]
        lang: Option<String>,
        #[arg(required = true)]
        request: Vec<String>,
    },
    /// View or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// List recent prompts
    Recents,
    /// List available commands
    Commands,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Store the OpenAI API key
    SetApiKey { key: String },
    /// Switch provider (openai | ollama)
    Provider { provider: Provider },
    /// Set the model for the active provider
    Model { model: String },
    /// Turn streaming on or off
    Streaming {
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        enabled: bool,
    },
    ToggleStreaming,
    /// Number of recent prompts to keep (1-20)
    RecentsLimit { limit: usize },
    ToggleRecents,
    /// Replace a command's template with the contents of a file
    Template {
        command: CommandType,
        #[arg(long)]
        file: PathBuf,
    },
    /// Restore a command's default template
    ResetTemplate { command: CommandType },
}

fn parse_switch(s: &str) -> Result<bool, String> {
    match s {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(format!("expected on or off, got '{s}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(path) = cli.settings {
        config.settings_path = path;
    }

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let mut store = SettingsStore::load(
        Box::new(JsonFileStore::new(&config.settings_path)),
        notifier.clone(),
    )
    .with_context(|| {
        format!(
            "Failed to load settings from {}",
            config.settings_path.display()
        )
    })?;

    let setting_key = matches!(
        cli.command,
        Commands::Settings {
            action: SettingsCommand::SetApiKey { .. }
        }
    );
    if !setting_key && missing_api_key(store.get(), &config) {
        notifier.notice(API_KEY_NOTICE);
    }

    match cli.command {
        Commands::Selection {
            file,
            from,
            to,
            request,
        } => {
            let job = Job::new(CommandType::Selection, file, request);
            job.run(&mut store, &config, notifier, |buffer| {
                buffer.with_selection(from, to)
            })
            .await
        }
        Commands::Cursor { file, at, request } => {
            let job = Job::new(CommandType::Cursor, file, request);
            job.run(&mut store, &config, notifier, |buffer| buffer.with_cursor(at))
                .await
        }
        Commands::Document { file, request } => {
            let job = Job::new(CommandType::Document, file, request);
            job.run(&mut store, &config, notifier, |buffer| buffer).await
        }
        Commands::Youtube {
            file,
            at,
            link,
            lang,
            request,
        } => {
            let mut job = Job::new(CommandType::Youtube, file, request);
            job.input = job.input.with_link(link);
            if let Some(lang) = lang {
                config.transcript_lang = lang;
            }
            job.run(&mut store, &config, notifier, |buffer| buffer.with_cursor(at))
                .await
        }
        Commands::Settings { action } => {
            match apply_settings(&mut store, notifier.as_ref(), action) {
                // Rejections were already shown as notices
                Err(e) if e.is_rejected() => std::process::exit(1),
                result => result.context("Failed to update settings"),
            }
        }
        Commands::Recents => {
            print_recents(store.get());
            Ok(())
        }
        Commands::Commands => {
            for command in CommandType::ALL {
                println!("{}\t{}\t{}", command.id(), command.title(), command.subtitle());
            }
            Ok(())
        }
    }
}

/// `RUST_LOG` when set, otherwise `info`
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn missing_api_key(settings: &Settings, config: &AppConfig) -> bool {
    settings.provider == Provider::OpenAi
        && settings.api_key.openai.is_none()
        && config.openai_api_key.is_none()
}

/// One generation against a file on disk
struct Job {
    command: CommandType,
    file: PathBuf,
    input: PromptInput,
}

impl Job {
    fn new(command: CommandType, file: PathBuf, request: Vec<String>) -> Self {
        Self {
            command,
            file,
            input: PromptInput::new(request.join(" ")),
        }
    }

    async fn run(
        self,
        store: &mut SettingsStore,
        config: &AppConfig,
        notifier: Arc<dyn Notifier>,
        place: impl FnOnce(TextBuffer) -> TextBuffer,
    ) -> Result<()> {
        let text = read_document(&self.file)?;
        let mut buffer = place(TextBuffer::new(text));

        let client = Backend::from_settings(store.get(), config);
        let transcripts = HttpTranscriptSource::new(config.transcript_url.clone());

        let outcome = Dispatcher::new(store, &client, &transcripts, notifier)
            .with_transcript_lang(config.transcript_lang.clone())
            .run(self.command, self.input, &mut buffer)
            .await;

        match outcome {
            Outcome::Succeeded => std::fs::write(&self.file, buffer.text())
                .with_context(|| format!("Failed to write {}", self.file.display())),
            Outcome::Rejected => bail!("Nothing was generated"),
            Outcome::Failed(message) => bail!(message),
        }
    }
}

fn read_document(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        // A new note starts empty
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn apply_settings(
    store: &mut SettingsStore,
    notifier: &dyn Notifier,
    action: SettingsCommand,
) -> Result<(), SettingsError> {
    let unknown_model = |e: String| {
        notifier.notice(&e);
        SettingsError::rejected(e)
    };

    match action {
        SettingsCommand::Show => {
            let mut shown = store.get().clone();
            if shown.api_key.openai.is_some() {
                shown.api_key.openai = Some("********".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        SettingsCommand::SetApiKey { key } => store.set_api_key(&key)?,
        SettingsCommand::Provider { provider } => store.set_provider(provider)?,
        SettingsCommand::Model { model } => match store.get().provider {
            Provider::OpenAi => {
                let model: OpenAiModel = model.parse().map_err(unknown_model)?;
                store.set_openai_model(model)?;
            }
            Provider::Ollama => {
                let model: OllamaModel = model.parse().map_err(unknown_model)?;
                store.set_ollama_model(model)?;
            }
        },
        SettingsCommand::Streaming { enabled } => store.set_streaming(enabled)?,
        SettingsCommand::ToggleStreaming => {
            let enabled = store.toggle_streaming()?;
            println!("Streaming {}", if enabled { "on" } else { "off" });
        }
        SettingsCommand::RecentsLimit { limit } => store.set_recents_limit(limit)?,
        SettingsCommand::ToggleRecents => {
            let enabled = store.toggle_recents()?;
            println!("Recent prompts {}", if enabled { "on" } else { "off" });
        }
        SettingsCommand::Template { command, file } => {
            let text = std::fs::read_to_string(&file)?;
            store.set_template(command, &text)?;
        }
        SettingsCommand::ResetTemplate { command } => store.reset_template(command)?,
    }
    Ok(())
}

fn print_recents(settings: &Settings) {
    if !settings.recent_prompts_enabled {
        println!("Recent prompts are disabled (sprompt settings toggle-recents)");
        return;
    }
    if settings.recents.is_empty() {
        println!("No recent prompts");
        return;
    }
    for (i, prompt) in settings.recents.iter().enumerate() {
        println!("{:>2}. {prompt}", i + 1);
    }
}
