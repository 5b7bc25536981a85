//! The long-lived handle to the model conversation.
//!
//! The HTTP endpoint is stateless, so the handle keeps every completed
//! exchange and replays it ahead of each new user message.

use crate::api::{Content, GenerateContentRequest};

#[derive(Debug, Clone)]
pub struct ChatSession {
    model: String,
    system_instruction: String,
    history: Vec<Content>,
}

impl ChatSession {
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
            history: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    pub fn build_request(&self, user_content: &Content) -> GenerateContentRequest {
        let mut contents = Vec::with_capacity(self.history.len() + 1);
        contents.extend(self.history.iter().cloned());
        contents.push(user_content.clone());

        GenerateContentRequest {
            system_instruction: (!self.system_instruction.is_empty())
                .then(|| Content::instruction(self.system_instruction.clone())),
            contents,
        }
    }

    /// Records a finished exchange. Empty replies are dropped together with
    /// their prompt so the history keeps alternating user/model turns.
    pub fn record_exchange(&mut self, user_content: Content, reply: &str) {
        if reply.is_empty() {
            return;
        }
        self.history.push(user_content);
        self.history.push(Content::model(reply));
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}
