//! MateTutor is a terminal-first maths tutor that relays text and image
//! questions to a hosted Gemini chat model and streams the reply back.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the pending attachment, the session
//!   handle, and streaming orchestration against the model service.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`commands`] implements the slash commands typed into the input.
//! - [`api`] defines the request/response payloads of the chat endpoint.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
