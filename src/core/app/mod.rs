use tokio_util::sync::CancellationToken;

use crate::api::GenerateContentRequest;
use crate::core::chat_stream::StreamParams;
use crate::core::message::Turn;
use crate::core::persona::Persona;
use crate::core::session::ChatSession;
use crate::ui::theme::Theme;

pub mod actions;
pub mod session;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionContext, AppActionDispatcher,
    AppActionEnvelope, AppCommand,
};
pub use session::SessionContext;
pub use ui_state::{InputForm, UiState};

/// Everything needed to open a chat run.
pub struct AppInitConfig {
    pub model: String,
    pub persona: Persona,
    pub theme: Theme,
}

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
    pub greeting: String,
}

impl App {
    pub fn new(init: AppInitConfig) -> Self {
        let AppInitConfig {
            model,
            persona,
            theme,
        } = init;
        let chat = ChatSession::new(model, persona.system_instruction);

        let mut app = App {
            session: SessionContext::new(chat),
            ui: UiState::new(theme),
            greeting: persona.greeting,
        };
        app.show_greeting();
        app
    }

    /// Shows the opening message. It is display-only and never part of the
    /// model-facing history.
    pub fn show_greeting(&mut self) {
        if !self.greeting.is_empty() {
            self.ui
                .transcript
                .push(Turn::assistant(self.greeting.clone()));
        }
    }

    pub fn is_current_stream(&self, stream_id: u64) -> bool {
        self.session.current_stream_id == stream_id && self.ui.is_streaming
    }

    pub fn input_area_height(&self, width: u16) -> u16 {
        self.ui.input.calculate_height(width)
    }

    /// Stops the in-flight turn, keeping whatever text already arrived.
    /// Returns whether anything was running.
    pub fn cancel_current_stream(&mut self) -> bool {
        let was_running = self.session.cancel_stream() || self.ui.is_streaming;
        if was_running {
            self.ui.transcript.abandon_response();
            self.ui.end_streaming();
        }
        was_running
    }

    pub fn build_stream_params(
        &self,
        request: GenerateContentRequest,
        cancel_token: CancellationToken,
        stream_id: u64,
    ) -> StreamParams {
        StreamParams {
            request,
            cancel_token,
            stream_id,
        }
    }

    pub fn title(&self) -> String {
        format!("MateTutor · {}", self.session.model())
    }
}
