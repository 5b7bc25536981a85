//! Event polling, dispatching, and UI rendering loop.
//!
//! The loop owns the [`App`] outright. Terminal input and stream updates
//! arrive over channels and become [`AppAction`]s, which are applied in
//! order before the next frame is drawn.

use std::{
    error::Error,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::prelude::Size;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::core::app::{
    apply_actions, App, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope,
    AppCommand,
};
use crate::core::chat_stream::{ChatBackend, ChatStreamService, StreamMessage};
use crate::ui::renderer::ui;

use super::keybindings::{resolve_key, resolve_mouse, sanitize_paste, KeyContext, KeyResult};
use super::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

const MAX_FPS: u64 = 60;
/// Redraw cadence for the loading animation.
const ANIMATION_INTERVAL: Duration = Duration::from_millis(120);
/// How long a status line stays up before it clears itself.
const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

fn context_for(size: Size) -> AppActionContext {
    AppActionContext {
        term_width: size.width,
        term_height: size.height,
    }
}

fn try_draw_frame(
    app: &mut App,
    terminal: &mut ChatTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> std::io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    terminal.draw(|f| ui(f, app))?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Drains pending terminal events. Returns whether any arrived.
fn process_ui_events(
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
    term_size: Size,
) -> bool {
    let mut events_processed = false;
    let ctx = context_for(term_size);

    while let Ok(ev) = event_rx.try_recv() {
        events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                route_keyboard_event(app, dispatcher, key, ctx);
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                let sanitized = sanitize_paste(&text);
                if !sanitized.is_empty() {
                    dispatcher.dispatch(AppAction::InsertIntoInput { text: sanitized }, ctx);
                }
            }
            UiEvent::Crossterm(Event::Mouse(mouse)) => {
                if let Some(action) = resolve_mouse(&mouse) {
                    dispatcher.dispatch(action, ctx);
                }
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    events_processed
}

fn route_keyboard_event(
    app: &mut App,
    dispatcher: &AppActionDispatcher,
    key: KeyEvent,
    ctx: AppActionContext,
) {
    let context = KeyContext {
        input_empty: app.ui.input.is_text_empty(),
        is_streaming: app.ui.is_streaming,
    };

    match resolve_key(&key, context) {
        KeyResult::Dispatch(action) => dispatcher.dispatch(action, ctx),
        KeyResult::EditInput => app.ui.input.apply_edit(|ta| {
            ta.input(tui_textarea::Input::from(key));
        }),
        KeyResult::NewLine => app.ui.input.insert_newline(),
        KeyResult::NotHandled => {}
    }
}

/// Turns queued stream messages into actions, merging consecutive
/// fragments. Messages from superseded streams are dropped here.
fn process_stream_updates(
    dispatcher: &AppActionDispatcher,
    rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>,
    ctx: AppActionContext,
    current_stream_id: u64,
) -> bool {
    let mut received_any = false;
    let mut actions = Vec::new();
    let mut coalesced_chunks = String::new();

    while let Ok((message, stream_id)) = rx.try_recv() {
        if stream_id != current_stream_id {
            debug!(stream_id, "Dropping update from superseded stream");
            continue;
        }
        received_any = true;

        let action = match message {
            StreamMessage::Chunk(content) => {
                coalesced_chunks.push_str(&content);
                continue;
            }
            StreamMessage::Started => AppAction::StreamStarted { stream_id },
            StreamMessage::Error(message) => AppAction::StreamErrored { message, stream_id },
            StreamMessage::End => AppAction::StreamCompleted { stream_id },
        };

        if !coalesced_chunks.is_empty() {
            actions.push(AppAction::AppendResponseChunk {
                content: std::mem::take(&mut coalesced_chunks),
                stream_id,
            });
        }
        actions.push(action);
    }

    if !coalesced_chunks.is_empty() {
        actions.push(AppAction::AppendResponseChunk {
            content: coalesced_chunks,
            stream_id: current_stream_id,
        });
    }

    if !actions.is_empty() {
        dispatcher.dispatch_many(actions, ctx);
    }

    received_any
}

fn drain_action_queue(
    app: &mut App,
    stream_service: &ChatStreamService,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }

    if pending.is_empty() {
        return false;
    }

    for cmd in apply_actions(app, pending) {
        match cmd {
            AppCommand::SpawnStream(params) => stream_service.spawn_stream(params),
        }
    }
    true
}

fn status_expired(app: &App, now: Instant) -> bool {
    app.ui
        .status_set_at
        .is_some_and(|set_at| now.duration_since(set_at) >= STATUS_TTL)
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(mut app: App, backend: Arc<dyn ChatBackend>) -> Result<(), Box<dyn Error>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let dispatcher = AppActionDispatcher::new(action_tx);

    let (stream_service, mut stream_rx) = ChatStreamService::new(backend);

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);
    info!(model = app.session.model(), "Chat session started");

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut last_animation_frame = Instant::now();
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = loop {
        if app.ui.exit_requested {
            break Ok(());
        }

        if let Err(err) = try_draw_frame(
            &mut app,
            &mut terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        ) {
            break Err(err.into());
        }

        let term_size = terminal.size().unwrap_or_default();
        let ctx = context_for(term_size);

        let events_processed = process_ui_events(&mut app, &mut event_rx, &dispatcher, term_size);

        let received_any = process_stream_updates(
            &dispatcher,
            &mut stream_rx,
            ctx,
            app.session.current_stream_id,
        );

        let now = Instant::now();
        if status_expired(&app, now) {
            dispatcher.dispatch(AppAction::ClearStatus, ctx);
        }

        let actions_applied = drain_action_queue(&mut app, &stream_service, &mut action_rx);

        if events_processed || received_any || actions_applied {
            request_redraw = true;
        }

        if app.ui.transcript.is_loading()
            && now.duration_since(last_animation_frame) >= ANIMATION_INTERVAL
        {
            request_redraw = true;
            last_animation_frame = now;
        }

        let idle = !events_processed && !received_any && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    event_reader_handle.abort();
    app.cancel_current_stream();
    restore_terminal(&mut terminal)?;
    info!("Chat session ended");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_app, ScriptedBackend};
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};

    const CTX: AppActionContext = AppActionContext {
        term_width: 80,
        term_height: 24,
    };

    fn dispatcher() -> (
        AppActionDispatcher,
        mpsc::UnboundedReceiver<AppActionEnvelope>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AppActionDispatcher::new(tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>) -> Vec<AppAction> {
        let mut actions = Vec::new();
        while let Ok(envelope) = rx.try_recv() {
            actions.push(envelope.action);
        }
        actions
    }

    #[test]
    fn consecutive_chunks_are_coalesced_between_lifecycle_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for message in [
            StreamMessage::Started,
            StreamMessage::Chunk("Ho".into()),
            StreamMessage::Chunk("la".into()),
            StreamMessage::End,
        ] {
            tx.send((message, 7)).expect("send");
        }
        tx.send((StreamMessage::Chunk("viejo".into()), 6))
            .expect("send");

        let (dispatcher, mut action_rx) = dispatcher();
        assert!(process_stream_updates(&dispatcher, &mut rx, CTX, 7));

        let actions = drain(&mut action_rx);
        assert_eq!(actions.len(), 3);
        assert!(matches!(actions[0], AppAction::StreamStarted { stream_id: 7 }));
        assert!(matches!(
            &actions[1],
            AppAction::AppendResponseChunk { content, stream_id: 7 } if content == "Hola"
        ));
        assert!(matches!(actions[2], AppAction::StreamCompleted { stream_id: 7 }));
    }

    #[test]
    fn trailing_chunks_are_flushed_without_an_end() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send((StreamMessage::Chunk("par".into()), 3)).expect("send");
        tx.send((StreamMessage::Chunk("cial".into()), 3)).expect("send");

        let (dispatcher, mut action_rx) = dispatcher();
        process_stream_updates(&dispatcher, &mut rx, CTX, 3);

        let actions = drain(&mut action_rx);
        assert!(matches!(
            actions.as_slice(),
            [AppAction::AppendResponseChunk { content, stream_id: 3 }] if content == "parcial"
        ));
    }

    #[test]
    fn superseded_streams_produce_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send((StreamMessage::Error("boom".into()), 1)).expect("send");

        let (dispatcher, mut action_rx) = dispatcher();
        assert!(!process_stream_updates(&dispatcher, &mut rx, CTX, 2));
        assert!(drain(&mut action_rx).is_empty());
    }

    #[test]
    fn typing_edits_the_input_directly() {
        let mut app = create_test_app();
        let (dispatcher, mut action_rx) = dispatcher();

        for ch in ['2', '+', '2'] {
            route_keyboard_event(
                &mut app,
                &dispatcher,
                KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE),
                CTX,
            );
        }
        route_keyboard_event(
            &mut app,
            &dispatcher,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT),
            CTX,
        );

        assert_eq!(app.ui.input.text(), "2+2\n");
        assert!(drain(&mut action_rx).is_empty());
    }

    #[test]
    fn paste_becomes_an_insert_action() {
        let mut app = create_test_app();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        event_tx
            .send(UiEvent::Crossterm(Event::Paste("a\r\nb\u{7}".into())))
            .expect("send");

        let (dispatcher, mut action_rx) = dispatcher();
        assert!(process_ui_events(
            &mut app,
            &mut event_rx,
            &dispatcher,
            Size::new(80, 24)
        ));

        let actions = drain(&mut action_rx);
        assert!(matches!(
            actions.as_slice(),
            [AppAction::InsertIntoInput { text }] if text == "a\nb"
        ));
    }

    #[tokio::test]
    async fn submitted_turn_streams_through_the_queue() {
        let mut app = create_test_app();
        let backend = Arc::new(ScriptedBackend::with_fragments(&["Hola", " mundo"]));
        let (service, mut stream_rx) = ChatStreamService::new(backend.clone());
        let (dispatcher, mut action_rx) = dispatcher();

        app.ui.input.set_text("saluda");
        dispatcher.dispatch(AppAction::SubmitTurn, CTX);
        assert!(drain_action_queue(&mut app, &service, &mut action_rx));
        assert!(app.ui.is_streaming);

        let deadline = Instant::now() + Duration::from_secs(2);
        while app.ui.is_streaming && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
            process_stream_updates(
                &dispatcher,
                &mut stream_rx,
                CTX,
                app.session.current_stream_id,
            );
            drain_action_queue(&mut app, &service, &mut action_rx);
        }

        assert!(!app.ui.is_streaming);
        assert_eq!(
            app.ui.transcript.last().map(|turn| turn.text()),
            Some("Hola mundo")
        );
        assert_eq!(app.session.chat.history().len(), 2);
        assert_eq!(backend.requests().len(), 1);
    }

    #[test]
    fn statuses_expire_after_their_ttl() {
        let mut app = create_test_app();
        assert!(!status_expired(&app, Instant::now()));

        app.ui.set_status("Imagen adjunta");
        assert!(!status_expired(&app, Instant::now()));
        assert!(status_expired(&app, Instant::now() + STATUS_TTL));
    }
}
