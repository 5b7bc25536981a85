//! Terminal UI layer for the tutor chat.
//!
//! - [`chat_loop`]: event loop, terminal lifecycle and keybindings.
//! - [`renderer`]: frame composition from [`crate::core::app::App`].
//! - [`theme`]: color and style policy.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! the conversation and the relay.

pub mod chat_loop;
pub mod renderer;
pub mod theme;
