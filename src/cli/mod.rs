//! Command-line interface parsing and handling
//!
//! This module parses arguments, prepares the shared runtime pieces
//! (configuration, credentials, logging, the model backend) and runs the
//! selected command.

pub mod say;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::core::app::{App, AppInitConfig};
use crate::core::chat_stream::GeminiBackend;
use crate::core::config::defaults::ConfigKey;
use crate::core::config::Config;
use crate::core::credentials::resolve_api_key;
use crate::core::persona::Persona;
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::Theme;
use crate::utils::logging::init_tracing;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "matetutor")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal maths tutor for ICFES practice questions")]
#[command(
    long_about = "MateTutor is a full-screen terminal tutor. Type a maths question or attach \
a photo of one, and the tutor guides you towards the answer step by step instead of \
giving it away. Replies stream in as they are generated.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    API key for the Gemini service (API_KEY is accepted as a fallback)\n\
  MATETUTOR_LOG     Log filter, e.g. 'debug' (defaults to 'info')\n\n\
Controls:\n\
  Enter             Send the question\n\
  Shift+Enter       Insert a newline\n\
  Ctrl+X            Remove the attached image\n\
  Esc               Cancel the reply being written\n\
  PgUp/PgDn/Mouse   Scroll through the conversation\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /attach <path>    Attach an image to the next question\n\
  /detach           Remove the attached image\n\
  /clear            Start the conversation over\n\
  /help             Show the in-app help"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use (overrides the config file)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostic logs to this file instead of the cache directory
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question and print the streamed reply
    Say {
        /// Image to send along with the question
        #[arg(short = 'i', long, value_name = "IMAGE")]
        image: Option<PathBuf>,
        /// Question text (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set (model, base-url, theme)
        key: String,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => handle_set(&key, value),
        Commands::Unset { key } => handle_unset(&key),
        Commands::Chat => {
            let session = prepare_session(args.model.as_deref(), args.log.as_deref())?;
            let app = App::new(AppInitConfig {
                model: session.model.clone(),
                persona: session.persona,
                theme: session.theme,
            });
            run_chat(app, Arc::new(session.backend)).await
        }
        Commands::Say { image, prompt } => {
            let session = prepare_session(args.model.as_deref(), args.log.as_deref())?;
            say::run_say(prompt, image, session).await
        }
    }
}

/// Everything a chat or one-shot command needs, resolved from flags,
/// the config file, and the environment.
pub struct SessionSetup {
    pub model: String,
    pub persona: Persona,
    pub theme: Theme,
    pub backend: GeminiBackend,
}

fn prepare_session(
    cli_model: Option<&str>,
    log: Option<&std::path::Path>,
) -> Result<SessionSetup, Box<dyn Error>> {
    let api_key = match resolve_api_key() {
        Ok(key) => key,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let config = Config::load()?;

    // The UI still works without a log file, so a failure here only warns.
    match init_tracing(log) {
        Ok(Some(path)) => info!(path = %path.display(), "Logging initialized"),
        Ok(None) => {}
        Err(err) => eprintln!("⚠️  Logging disabled: {err}"),
    }

    let model = config.resolve_model(cli_model);
    let base_url = config.resolve_base_url();
    info!(model = %model, base_url = %base_url, "Resolved session");

    let backend = GeminiBackend::new(reqwest::Client::new(), base_url, api_key, model.clone());
    Ok(SessionSetup {
        persona: Persona::from_config(&config),
        theme: Theme::from_name(config.theme.as_deref().unwrap_or("dark")),
        model,
        backend,
    })
}

fn parse_key(key: &str) -> ConfigKey {
    match key.parse::<ConfigKey>() {
        Ok(key) => key,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}

fn handle_set(key: &str, value: Vec<String>) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let key = parse_key(key);
    let value = value.join(" ");
    if value.trim().is_empty() {
        config.print_all();
        return Ok(());
    }

    if key == ConfigKey::Theme && Theme::lookup(&value).is_none() {
        eprintln!(
            "❌ Unknown theme: {value} (expected one of: {})",
            crate::ui::theme::THEME_NAMES.join(", ")
        );
        std::process::exit(1);
    }

    config.set_value(key, value.trim().to_string());
    config.save()?;
    println!("✅ Set {key} to: {}", value.trim());
    Ok(())
}

fn handle_unset(key: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let key = parse_key(key);
    config.unset_value(key);
    config.save()?;
    println!("✅ Unset {key}");
    Ok(())
}

#[cfg(test)]
mod tests;
