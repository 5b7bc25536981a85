use tracing::{debug, error, info};

use super::{App, AppAction, AppActionContext, AppCommand};
use crate::commands::{process_input, CommandResult};
use crate::core::chat_stream::RelayError;
use crate::core::persona::FAILURE_MESSAGE;
use crate::core::submission::Submission;

pub(super) fn handle_streaming_action(
    app: &mut App,
    action: AppAction,
    _ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::SubmitTurn => submit_turn(app),
        AppAction::StreamStarted { stream_id } => {
            if !app.is_current_stream(stream_id) {
                return None;
            }
            app.ui.transcript.begin_response();
            app.ui.scroll_to_bottom();
            None
        }
        AppAction::AppendResponseChunk { content, stream_id } => {
            if !app.is_current_stream(stream_id) {
                return None;
            }
            append_response_chunk(app, &content);
            None
        }
        AppAction::StreamErrored { message, stream_id } => {
            if !app.is_current_stream(stream_id) {
                return None;
            }
            handle_stream_error(app, &message);
            None
        }
        AppAction::StreamCompleted { stream_id } => {
            if !app.is_current_stream(stream_id) {
                return None;
            }
            finalize_stream(app);
            None
        }
        AppAction::CancelStreaming => {
            if app.cancel_current_stream() {
                debug!(stream_id = app.session.current_stream_id, "Turn cancelled");
                app.ui.set_status("Respuesta cancelada");
            }
            None
        }
        _ => unreachable!("non-streaming action routed to streaming handler"),
    }
}

/// Slash commands run locally; anything else leaves the form as one turn.
fn submit_turn(app: &mut App) -> Option<AppCommand> {
    let text = app.ui.input.text();
    if text.trim_start().starts_with('/') {
        if let CommandResult::Continue = process_input(app, &text) {
            app.ui.input.clear_text();
            return None;
        }
    }

    let submission = app.ui.input.take_submission()?;
    spawn_stream_for_submission(app, submission)
}

pub(super) fn spawn_stream_for_submission(
    app: &mut App,
    submission: Submission,
) -> Option<AppCommand> {
    if app.cancel_current_stream() {
        debug!("Previous turn superseded by a new submission");
    }
    app.ui.clear_status();

    if let Some(turn) = submission.user_turn() {
        app.ui.transcript.push(turn);
    }
    app.ui.transcript.show_loading();
    app.ui.begin_streaming();
    let (cancel_token, stream_id) = app.session.start_new_stream();

    let user_content = match submission.to_content() {
        Ok(content) => content,
        Err(err) => {
            app.session.cancel_stream();
            report_failure(app, &RelayError::from(err).to_string());
            return None;
        }
    };

    let request = app.session.chat.build_request(&user_content);
    app.session.pending_exchange = Some(user_content);
    info!(
        stream_id,
        has_image = submission.attachment().is_some(),
        history = app.session.chat.history().len(),
        "Submitting turn"
    );

    Some(AppCommand::SpawnStream(app.build_stream_params(
        request,
        cancel_token,
        stream_id,
    )))
}

fn append_response_chunk(app: &mut App, chunk: &str) {
    if chunk.is_empty() {
        return;
    }
    app.ui.transcript.append_fragment(chunk);
    app.ui.scroll_to_bottom();
}

fn handle_stream_error(app: &mut App, message: &str) {
    app.session.finish_stream();
    report_failure(app, message.trim());
}

/// Logs the cause and replaces the turn's output with the generic failure.
fn report_failure(app: &mut App, cause: &str) {
    error!(stream_id = app.session.current_stream_id, "Turn failed: {cause}");
    app.ui.transcript.fail_response(FAILURE_MESSAGE);
    app.ui.scroll_to_bottom();
    app.ui.end_streaming();
}

fn finalize_stream(app: &mut App) {
    let pending = app.session.finish_stream();
    // Fail while the live turn is still tracked so it gets replaced.
    if !app.ui.transcript.has_response_text() {
        report_failure(app, "stream ended without any reply text");
        return;
    }
    let reply = app.ui.transcript.finish_response().unwrap_or_default();
    if let Some(user_content) = pending {
        app.session.chat.record_exchange(user_content, &reply);
    }
    app.ui.end_streaming();
    debug!(
        stream_id = app.session.current_stream_id,
        chars = reply.chars().count(),
        "Turn completed"
    );
}
