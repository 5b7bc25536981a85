use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Muestra los comandos y atajos disponibles.",
        handler: super::handle_help,
    },
    Command {
        name: "attach",
        usage: "/attach <ruta>",
        help: "Adjunta una imagen al próximo mensaje (reemplaza la anterior).",
        handler: super::handle_attach,
    },
    Command {
        name: "detach",
        usage: "/detach",
        help: "Quita la imagen adjunta.",
        handler: super::handle_detach,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Empieza una conversación nueva.",
        handler: super::handle_clear,
    },
];
