mod registry;

pub use registry::{all_commands, CommandInvocation};

use std::path::PathBuf;

use directories::BaseDirs;

use crate::core::app::actions::input::{attach_file, clear_conversation, remove_attachment};
use crate::core::app::App;
use crate::core::message::Turn;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

const KEY_HELP: &str = "Atajos: Enter envía · Shift+Enter o Alt+Enter nueva línea · \
Ctrl+X quita la imagen · Esc cancela la respuesta · RePág/AvPág desplazan · Ctrl+C sale";

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            let invocation = CommandInvocation { args };
            (command.handler)(app, invocation)
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Comandos:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:<16} {}\n", command.usage, command.help));
    }
    help.push_str(KEY_HELP);
    app.ui.transcript.push(Turn::app_info(help));
    app.ui.scroll_to_bottom();
    CommandResult::Continue
}

pub(super) fn handle_attach(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.ui.set_status("Uso: /attach <ruta>");
        return CommandResult::Continue;
    }
    attach_file(app, expand_home(invocation.args));
    CommandResult::Continue
}

pub(super) fn handle_detach(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    remove_attachment(app);
    CommandResult::Continue
}

pub(super) fn handle_clear(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    clear_conversation(app);
    CommandResult::Continue
}

/// Expands a leading `~` and strips surrounding quotes from a typed path.
pub fn expand_home(raw: &str) -> PathBuf {
    let unquoted = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

    match (unquoted.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
            home.join(&rest[1..])
        }
        _ => PathBuf::from(unquoted),
    }
}
