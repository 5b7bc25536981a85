use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream;

use crate::api::GenerateContentRequest;
use crate::core::app::{App, AppInitConfig};
use crate::core::chat_stream::{ChatBackend, FragmentStream, RelayError};
use crate::core::persona::Persona;
use crate::ui::theme::Theme;

pub fn create_test_app() -> App {
    App::new(AppInitConfig {
        model: "test-model".to_string(),
        persona: Persona::default(),
        theme: Theme::dark_default(),
    })
}

enum Script {
    Fragments(Vec<String>),
    FailOpen(String),
    Pending,
}

/// A [`ChatBackend`] that replays a fixed script and records requests.
pub struct ScriptedBackend {
    script: Script,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedBackend {
    fn new(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fragments(fragments: &[&str]) -> Self {
        Self::new(Script::Fragments(
            fragments.iter().map(|f| f.to_string()).collect(),
        ))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Script::FailOpen(message.to_string()))
    }

    /// Never answers; useful for cancellation.
    pub fn pending() -> Self {
        Self::new(Script::Pending)
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn open_stream(
        &self,
        request: GenerateContentRequest,
    ) -> Result<FragmentStream, RelayError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request);
        }
        match &self.script {
            Script::Fragments(fragments) => {
                let items: Vec<Result<String, RelayError>> =
                    fragments.iter().cloned().map(Ok).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            Script::FailOpen(message) => Err(RelayError::Api(message.clone())),
            Script::Pending => std::future::pending().await,
        }
    }
}
