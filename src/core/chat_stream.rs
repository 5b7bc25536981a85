use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use memchr::memchr;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::core::attachment::AttachmentError;
use crate::utils::url::stream_generate_url;

pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Anything that makes a turn end without a complete reply.
#[derive(Debug)]
pub enum RelayError {
    Attachment(AttachmentError),
    Transport(reqwest::Error),
    Status { status: u16, message: String },
    Decode(serde_json::Error),
    /// An event line that is not valid UTF-8.
    Encoding(std::str::Utf8Error),
    Api(String),
    Blocked(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Attachment(err) => write!(f, "Attachment error: {err}"),
            RelayError::Transport(err) => write!(f, "Transport error: {err}"),
            RelayError::Status { status, message } => {
                write!(f, "HTTP {status}: {message}")
            }
            RelayError::Decode(err) => write!(f, "Malformed stream event: {err}"),
            RelayError::Encoding(err) => write!(f, "Stream event is not UTF-8: {err}"),
            RelayError::Api(message) => write!(f, "API error: {message}"),
            RelayError::Blocked(reason) => write!(f, "Prompt blocked: {reason}"),
        }
    }
}

impl StdError for RelayError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            RelayError::Attachment(err) => Some(err),
            RelayError::Transport(err) => Some(err),
            RelayError::Decode(err) => Some(err),
            RelayError::Encoding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AttachmentError> for RelayError {
    fn from(err: AttachmentError) -> Self {
        RelayError::Attachment(err)
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err)
    }
}

/// Reply text fragments in arrival order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn open_stream(
        &self,
        request: GenerateContentRequest,
    ) -> Result<FragmentStream, RelayError>;
}

#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    async fn open_stream(
        &self,
        request: GenerateContentRequest,
    ) -> Result<FragmentStream, RelayError> {
        let url = stream_generate_url(&self.base_url, &self.model);
        debug!(model = %self.model, contents = request.contents.len(), "Opening stream");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RelayError::Status {
                status: status.as_u16(),
                message: summarize_error_body(&body),
            });
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(RelayError::Transport));
        Ok(fragment_stream(body))
    }
}

/// Incremental `data:` line decoder for the server-sent event body.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes `bytes` and returns the fragments carried by every complete line.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<String>, RelayError> {
        self.buffer.extend_from_slice(bytes);
        let mut fragments = Vec::new();

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            if let Some(fragment) = decode_line(&line)? {
                fragments.push(fragment);
            }
        }
        Ok(fragments)
    }

    /// Flushes a trailing line that arrived without a newline.
    pub fn finish(&mut self) -> Result<Option<String>, RelayError> {
        let line = std::mem::take(&mut self.buffer);
        decode_line(&line)
    }
}

fn decode_line(raw: &[u8]) -> Result<Option<String>, RelayError> {
    let line = std::str::from_utf8(raw)
        .map_err(RelayError::Encoding)?
        .trim();
    match extract_data_payload(line) {
        Some(payload) => decode_payload(payload),
        None => Ok(None),
    }
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn decode_payload(payload: &str) -> Result<Option<String>, RelayError> {
    if payload.is_empty() {
        return Ok(None);
    }

    let response: GenerateContentResponse =
        serde_json::from_str(payload).map_err(RelayError::Decode)?;

    if let Some(error) = response.error.as_ref() {
        debug!(code = ?error.code, status = ?error.status, "Error object in stream");
        let message = error
            .message
            .clone()
            .or_else(|| error.status.clone())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(RelayError::Api(collapse_whitespace(&message)));
    }
    if let Some(reason) = response.block_reason() {
        return Err(RelayError::Blocked(reason.to_string()));
    }

    if let Some(reason) = response.finish_reason().filter(|reason| *reason != "STOP") {
        warn!(reason, "Candidate finished early");
    }

    let text = response.text();
    Ok((!text.is_empty()).then_some(text))
}

struct BodyState<S> {
    body: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

/// Adapts a raw body stream into a [`FragmentStream`]. The first error ends it.
pub fn fragment_stream<S, B>(body: S) -> FragmentStream
where
    S: Stream<Item = Result<B, RelayError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = BodyState {
        body: Box::pin(body),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    let stream = futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.pending.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(bytes)) => match state.decoder.feed(bytes.as_ref()) {
                    Ok(fragments) => state.pending.extend(fragments),
                    Err(err) => {
                        state.finished = true;
                        return Some((Err(err), state));
                    }
                },
                Some(Err(err)) => {
                    state.finished = true;
                    return Some((Err(err), state));
                }
                None => {
                    state.finished = true;
                    match state.decoder.finish() {
                        Ok(fragment) => state.pending.extend(fragment),
                        Err(err) => return Some((Err(err), state)),
                    }
                }
            }
        }
    });
    Box::pin(stream)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Short, single-line description of a non-success response body.
fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(trimmed) {
        if let Some(message) = envelope.error.message.or(envelope.error.status) {
            return collapse_whitespace(&message);
        }
    }
    collapse_whitespace(trimmed)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    /// The service accepted the request; fragments may follow.
    Started,
    Chunk(String),
    /// Terminal. No `End` follows an error.
    Error(String),
    End,
}

pub struct StreamParams {
    pub request: GenerateContentRequest,
    pub cancel_token: tokio_util::sync::CancellationToken,
    pub stream_id: u64,
}

#[derive(Clone)]
pub struct ChatStreamService {
    backend: Arc<dyn ChatBackend>,
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { backend, tx }, rx)
    }

    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let StreamParams {
                request,
                cancel_token,
                stream_id,
            } = params;

            tokio::select! {
                _ = relay_stream(backend, request, &tx, stream_id) => {}
                _ = cancel_token.cancelled() => {
                    debug!(stream_id, "Stream cancelled");
                }
            }
        });
    }
}

async fn relay_stream(
    backend: Arc<dyn ChatBackend>,
    request: GenerateContentRequest,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
) {
    let mut fragments = match backend.open_stream(request).await {
        Ok(stream) => stream,
        Err(err) => {
            let _ = tx.send((StreamMessage::Error(err.to_string()), stream_id));
            return;
        }
    };
    let _ = tx.send((StreamMessage::Started, stream_id));

    while let Some(item) = fragments.next().await {
        match item {
            Ok(fragment) => {
                let _ = tx.send((StreamMessage::Chunk(fragment), stream_id));
            }
            Err(err) => {
                let _ = tx.send((StreamMessage::Error(err.to_string()), stream_id));
                return;
            }
        }
    }
    let _ = tx.send((StreamMessage::End, stream_id));
}
