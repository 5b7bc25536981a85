use std::path::PathBuf;

use tracing::{info, warn};

use super::{App, AppAction, AppActionContext, AppCommand};
use crate::core::attachment::PendingAttachment;

pub(super) fn handle_input_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::AttachFile { path } => {
            attach_file(app, path);
            None
        }
        AppAction::RemoveAttachment => {
            remove_attachment(app);
            None
        }
        AppAction::ClearConversation => {
            clear_conversation(app);
            None
        }
        AppAction::InsertIntoInput { text } => {
            app.ui.input.insert_str(&text);
            None
        }
        AppAction::ClearStatus => {
            app.ui.clear_status();
            None
        }
        AppAction::ScrollLines { delta } => {
            app.ui.scroll_by(delta);
            None
        }
        AppAction::ScrollPage { up } => {
            let page = page_size(app, ctx);
            app.ui.scroll_by(if up { -page } else { page });
            None
        }
        AppAction::ScrollToBottom => {
            app.ui.scroll_to_bottom();
            None
        }
        AppAction::Quit => {
            app.cancel_current_stream();
            app.ui.exit_requested = true;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}

/// Transcript rows visible above the input box.
fn page_size(app: &App, ctx: AppActionContext) -> i32 {
    let input_rows = app.input_area_height(ctx.term_width) + 2;
    // Title and status rows
    let chrome = input_rows + 2;
    i32::from(ctx.term_height.saturating_sub(chrome).max(1))
}

pub(crate) fn attach_file(app: &mut App, path: PathBuf) {
    match PendingAttachment::from_path(&path) {
        Ok(attachment) => {
            let label = attachment.image_ref().label();
            info!(path = %attachment.path().display(), mime = attachment.mime_type(), "Attachment selected");
            match app.ui.input.attach(attachment) {
                Some(previous) => app.ui.set_status(format!(
                    "Imagen reemplazada ({} → {})",
                    previous.file_name(),
                    label
                )),
                None => app.ui.set_status(format!("Imagen adjunta: {label}")),
            }
        }
        Err(err) => {
            warn!("Attachment rejected: {err}");
            app.ui.set_status(format!("No se pudo adjuntar: {err}"));
        }
    }
}

pub(crate) fn remove_attachment(app: &mut App) {
    match app.ui.input.detach() {
        Some(removed) => app
            .ui
            .set_status(format!("Imagen quitada: {}", removed.file_name())),
        None => app.ui.set_status("No hay imagen adjunta"),
    }
}

/// Forgets the conversation on both sides and greets again. The pending
/// attachment and typed text survive.
pub(crate) fn clear_conversation(app: &mut App) {
    app.cancel_current_stream();
    app.ui.transcript.clear();
    app.session.chat.reset();
    app.show_greeting();
    app.ui.scroll_to_bottom();
    app.ui.set_status("Conversación reiniciada");
}
