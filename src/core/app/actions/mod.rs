pub(crate) mod input;
mod streaming;

use std::path::PathBuf;

use tokio::sync::mpsc;

use super::App;
use crate::core::chat_stream::StreamParams;

pub enum AppAction {
    /// Sends the input form's text and attachment as one user turn.
    SubmitTurn,
    StreamStarted {
        stream_id: u64,
    },
    AppendResponseChunk {
        content: String,
        stream_id: u64,
    },
    StreamErrored {
        message: String,
        stream_id: u64,
    },
    StreamCompleted {
        stream_id: u64,
    },
    CancelStreaming,
    AttachFile {
        path: PathBuf,
    },
    RemoveAttachment,
    ClearConversation,
    InsertIntoInput {
        text: String,
    },
    ClearStatus,
    ScrollLines {
        delta: i32,
    },
    ScrollPage {
        up: bool,
    },
    ScrollToBottom,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction, ctx: AppActionContext) {
        self.dispatch_many([action], ctx);
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }
}

pub enum AppCommand {
    SpawnStream(StreamParams),
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::SubmitTurn
        | AppAction::StreamStarted { .. }
        | AppAction::AppendResponseChunk { .. }
        | AppAction::StreamErrored { .. }
        | AppAction::StreamCompleted { .. }
        | AppAction::CancelStreaming => streaming::handle_streaming_action(app, action, ctx),

        AppAction::AttachFile { .. }
        | AppAction::RemoveAttachment
        | AppAction::ClearConversation
        | AppAction::InsertIntoInput { .. }
        | AppAction::ClearStatus
        | AppAction::ScrollLines { .. }
        | AppAction::ScrollPage { .. }
        | AppAction::ScrollToBottom
        | AppAction::Quit => input::handle_input_action(app, action, ctx),
    }
}
