use tokio_util::sync::CancellationToken;

use crate::api::Content;
use crate::core::session::ChatSession;

/// Conversation and stream bookkeeping for one chat run.
pub struct SessionContext {
    pub chat: ChatSession,
    pub stream_cancel_token: Option<CancellationToken>,
    pub current_stream_id: u64,
    /// User content of the in-flight turn, recorded once its reply completes.
    pub pending_exchange: Option<Content>,
}

impl SessionContext {
    pub fn new(chat: ChatSession) -> Self {
        Self {
            chat,
            stream_cancel_token: None,
            current_stream_id: 0,
            pending_exchange: None,
        }
    }

    pub fn model(&self) -> &str {
        self.chat.model()
    }

    /// Cancels any running stream and hands out a fresh token and id.
    pub fn start_new_stream(&mut self) -> (CancellationToken, u64) {
        self.cancel_stream();
        self.current_stream_id += 1;
        let token = CancellationToken::new();
        self.stream_cancel_token = Some(token.clone());
        (token, self.current_stream_id)
    }

    /// Returns whether a stream was running.
    pub fn cancel_stream(&mut self) -> bool {
        self.pending_exchange = None;
        match self.stream_cancel_token.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Drops the token of a stream that ended on its own.
    pub fn finish_stream(&mut self) -> Option<Content> {
        self.stream_cancel_token = None;
        self.pending_exchange.take()
    }
}
