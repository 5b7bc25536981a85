//! Maps key and mouse events to app actions.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::core::app::AppAction;

/// Rows moved per arrow press or wheel notch.
pub const SCROLL_STEP: i32 = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyContext {
    pub input_empty: bool,
    pub is_streaming: bool,
}

pub enum KeyResult {
    Dispatch(AppAction),
    /// Forward the key to the text area.
    EditInput,
    NewLine,
    NotHandled,
}

pub fn resolve_key(key: &KeyEvent, context: KeyContext) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyResult::Dispatch(AppAction::Quit),
        KeyCode::Char('x') if ctrl => KeyResult::Dispatch(AppAction::RemoveAttachment),
        KeyCode::Char('l') if ctrl => KeyResult::Dispatch(AppAction::ClearConversation),
        KeyCode::Char('j') if ctrl => KeyResult::NewLine,
        KeyCode::Enter if shift || alt => KeyResult::NewLine,
        KeyCode::Enter => KeyResult::Dispatch(AppAction::SubmitTurn),
        KeyCode::Esc if context.is_streaming => KeyResult::Dispatch(AppAction::CancelStreaming),
        KeyCode::Esc => KeyResult::Dispatch(AppAction::ClearStatus),
        KeyCode::PageUp => KeyResult::Dispatch(AppAction::ScrollPage { up: true }),
        KeyCode::PageDown => KeyResult::Dispatch(AppAction::ScrollPage { up: false }),
        KeyCode::Up if context.input_empty => {
            KeyResult::Dispatch(AppAction::ScrollLines { delta: -SCROLL_STEP })
        }
        KeyCode::Down if context.input_empty => {
            KeyResult::Dispatch(AppAction::ScrollLines { delta: SCROLL_STEP })
        }
        KeyCode::End if ctrl => KeyResult::Dispatch(AppAction::ScrollToBottom),
        KeyCode::F(_) | KeyCode::Null => KeyResult::NotHandled,
        _ => KeyResult::EditInput,
    }
}

pub fn resolve_mouse(event: &MouseEvent) -> Option<AppAction> {
    match event.kind {
        MouseEventKind::ScrollUp => Some(AppAction::ScrollLines {
            delta: -SCROLL_STEP,
        }),
        MouseEventKind::ScrollDown => Some(AppAction::ScrollLines { delta: SCROLL_STEP }),
        _ => None,
    }
}

/// Strips control characters from pasted text and normalizes line endings.
pub fn sanitize_paste(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', "    ")
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: ratatui::crossterm::event::KeyEventState::NONE,
        }
    }

    fn idle() -> KeyContext {
        KeyContext {
            input_empty: true,
            is_streaming: false,
        }
    }

    #[test]
    fn enter_submits_and_modified_enter_breaks_lines() {
        assert!(matches!(
            resolve_key(&key(KeyCode::Enter, KeyModifiers::NONE), idle()),
            KeyResult::Dispatch(AppAction::SubmitTurn)
        ));
        assert!(matches!(
            resolve_key(&key(KeyCode::Enter, KeyModifiers::SHIFT), idle()),
            KeyResult::NewLine
        ));
        assert!(matches!(
            resolve_key(&key(KeyCode::Enter, KeyModifiers::ALT), idle()),
            KeyResult::NewLine
        ));
    }

    #[test]
    fn escape_cancels_only_while_streaming() {
        let streaming = KeyContext {
            is_streaming: true,
            ..idle()
        };
        assert!(matches!(
            resolve_key(&key(KeyCode::Esc, KeyModifiers::NONE), streaming),
            KeyResult::Dispatch(AppAction::CancelStreaming)
        ));
        assert!(matches!(
            resolve_key(&key(KeyCode::Esc, KeyModifiers::NONE), idle()),
            KeyResult::Dispatch(AppAction::ClearStatus)
        ));
    }

    #[test]
    fn arrows_scroll_only_with_empty_input() {
        assert!(matches!(
            resolve_key(&key(KeyCode::Up, KeyModifiers::NONE), idle()),
            KeyResult::Dispatch(AppAction::ScrollLines { delta }) if delta == -SCROLL_STEP
        ));
        let typing = KeyContext {
            input_empty: false,
            ..idle()
        };
        assert!(matches!(
            resolve_key(&key(KeyCode::Up, KeyModifiers::NONE), typing),
            KeyResult::EditInput
        ));
    }

    #[test]
    fn control_shortcuts() {
        assert!(matches!(
            resolve_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), idle()),
            KeyResult::Dispatch(AppAction::Quit)
        ));
        assert!(matches!(
            resolve_key(&key(KeyCode::Char('x'), KeyModifiers::CONTROL), idle()),
            KeyResult::Dispatch(AppAction::RemoveAttachment)
        ));
        assert!(matches!(
            resolve_key(&key(KeyCode::F(5), KeyModifiers::NONE), idle()),
            KeyResult::NotHandled
        ));
        assert!(matches!(
            resolve_key(&key(KeyCode::Char('a'), KeyModifiers::NONE), idle()),
            KeyResult::EditInput
        ));
    }

    #[test]
    fn paste_is_sanitized() {
        assert_eq!(sanitize_paste("a\r\nb\tc\u{7}"), "a\nb    c");
    }
}
