//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::api::GenerateContentRequest;
use crate::core::attachment::PendingAttachment;
use crate::core::chat_stream::{ChatBackend, ChatStreamService, StreamMessage, StreamParams};
use crate::core::persona::FAILURE_MESSAGE;
use crate::core::session::ChatSession;
use crate::core::submission::Submission;

use super::SessionSetup;

pub async fn run_say(
    prompt: Vec<String>,
    image: Option<PathBuf>,
    setup: SessionSetup,
) -> Result<(), Box<dyn Error>> {
    let attachment = match image.map(PendingAttachment::from_path).transpose() {
        Ok(attachment) => attachment,
        Err(err) => {
            eprintln!("❌ Error: {err}");
            std::process::exit(1);
        }
    };

    let Some(submission) = Submission::new(&prompt.join(" "), attachment) else {
        eprintln!("Usage: matetutor say [-i IMAGE] <PROMPT>");
        std::process::exit(1);
    };

    let content = match submission.to_content() {
        Ok(content) => content,
        Err(err) => {
            error!("Attachment could not be encoded: {err}");
            eprintln!("{FAILURE_MESSAGE}");
            std::process::exit(1);
        }
    };

    let session = ChatSession::new(setup.model, setup.persona.system_instruction);
    let request = session.build_request(&content);

    let mut stdout = io::stdout();
    if let Err(message) = stream_reply(Arc::new(setup.backend), request, &mut stdout).await {
        error!("One-shot relay failed: {message}");
        eprintln!("\n{FAILURE_MESSAGE}");
        std::process::exit(1);
    }
    Ok(())
}

/// Relays one request, writing fragments to `out` as they arrive.
/// Returns the full reply, or the failure description.
async fn stream_reply<W: Write>(
    backend: Arc<dyn ChatBackend>,
    request: GenerateContentRequest,
    out: &mut W,
) -> Result<String, String> {
    let (stream_service, mut rx) = ChatStreamService::new(backend);
    stream_service.spawn_stream(StreamParams {
        request,
        cancel_token: CancellationToken::new(),
        stream_id: 1,
    });

    let mut full_response = String::new();
    loop {
        match rx.recv().await {
            Some((StreamMessage::Chunk(content), _)) => {
                full_response.push_str(&content);
                write!(out, "{content}").map_err(|e| e.to_string())?;
                out.flush().map_err(|e| e.to_string())?;
            }
            Some((StreamMessage::Error(err), _)) => return Err(err),
            Some((StreamMessage::End, _)) => break,
            Some((StreamMessage::Started, _)) => {}
            None => return Err("stream closed without completing".to_string()),
        }
    }

    if full_response.is_empty() {
        return Err("empty reply".to_string());
    }
    writeln!(out).map_err(|e| e.to_string())?;
    info!(chars = full_response.chars().count(), "One-shot reply complete");
    Ok(full_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Content, Part};
    use crate::utils::test_utils::ScriptedBackend;

    fn request() -> GenerateContentRequest {
        ChatSession::new("test-model", "").build_request(&Content::user(vec![Part::text("2+2=?")]))
    }

    #[tokio::test]
    async fn fragments_are_written_as_they_arrive() {
        let backend = Arc::new(ScriptedBackend::with_fragments(&["Pien", "sa en ", "2+2"]));
        let mut out = Vec::new();

        let reply = stream_reply(backend.clone(), request(), &mut out)
            .await
            .expect("reply");

        assert_eq!(reply, "Piensa en 2+2");
        assert_eq!(String::from_utf8(out).expect("utf8"), "Piensa en 2+2\n");
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn failures_are_reported_to_the_caller() {
        let backend = Arc::new(ScriptedBackend::failing("quota exceeded"));
        let mut out = Vec::new();

        let err = stream_reply(backend, request(), &mut out)
            .await
            .expect_err("should fail");
        assert!(err.contains("quota exceeded"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn an_empty_reply_counts_as_failure() {
        let backend = Arc::new(ScriptedBackend::with_fragments(&[]));
        let mut out = Vec::new();

        assert!(stream_reply(backend, request(), &mut out).await.is_err());
    }
}
