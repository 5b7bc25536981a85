use std::time::Instant;

use ratatui::prelude::Size;
use tui_textarea::{CursorMove, TextArea};

use crate::core::attachment::{AttachmentSlot, PendingAttachment};
use crate::core::submission::Submission;
use crate::core::transcript::Transcript;
use crate::ui::theme::Theme;
use crate::utils::scroll::ScrollCalculator;

/// Rows the input box may grow to before it scrolls internally.
pub const MAX_INPUT_ROWS: u16 = 6;

/// The text box and the pending attachment, submitted together.
pub struct InputForm {
    textarea: TextArea<'static>,
    attachment: AttachmentSlot,
}

impl Default for InputForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InputForm {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
            attachment: AttachmentSlot::default(),
        }
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_text_empty(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.is_empty())
    }

    pub fn set_text(&mut self, text: &str) {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn clear_text(&mut self) {
        self.textarea = TextArea::default();
    }

    pub fn insert_str(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    pub fn insert_newline(&mut self) {
        self.textarea.insert_newline();
    }

    pub fn apply_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        f(&mut self.textarea);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.textarea
    }

    pub fn attach(&mut self, attachment: PendingAttachment) -> Option<PendingAttachment> {
        self.attachment.attach(attachment)
    }

    pub fn detach(&mut self) -> Option<PendingAttachment> {
        self.attachment.detach()
    }

    pub fn attachment(&self) -> Option<&PendingAttachment> {
        self.attachment.get()
    }

    /// Empties the form into a submission. Leaves it untouched when there is
    /// nothing to send.
    pub fn take_submission(&mut self) -> Option<Submission> {
        let submission = Submission::new(&self.text(), self.attachment.get().cloned())?;
        self.clear_text();
        self.attachment.take();
        Some(submission)
    }

    /// Height of the text box in rows, excluding borders.
    pub fn calculate_height(&self, width: u16) -> u16 {
        if self.is_text_empty() {
            return 1;
        }
        let available_width = width.saturating_sub(2).max(1);
        let rows = ScrollCalculator::wrapped_line_count(&self.text(), available_width);
        u16::try_from(rows).unwrap_or(u16::MAX).clamp(1, MAX_INPUT_ROWS)
    }
}

pub struct UiState {
    pub transcript: Transcript,
    pub input: InputForm,
    pub scroll_offset: u16,
    /// Largest offset seen by the last render.
    pub max_scroll: u16,
    pub auto_scroll: bool,
    pub is_streaming: bool,
    pub pulse_start: Instant,
    pub status: Option<String>,
    pub status_set_at: Option<Instant>,
    pub exit_requested: bool,
    pub last_term_size: Size,
    pub theme: Theme,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            transcript: Transcript::new(),
            input: InputForm::new(),
            scroll_offset: 0,
            max_scroll: 0,
            auto_scroll: true,
            is_streaming: false,
            pulse_start: Instant::now(),
            status: None,
            status_set_at: None,
            exit_requested: false,
            last_term_size: Size::new(0, 0),
            theme,
        }
    }

    pub fn begin_streaming(&mut self) {
        self.is_streaming = true;
        self.pulse_start = Instant::now();
        self.auto_scroll = true;
    }

    pub fn end_streaming(&mut self) {
        self.is_streaming = false;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
        self.status_set_at = None;
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.scroll_offset).saturating_add(delta);
        let clamped = next.clamp(0, i32::from(self.max_scroll));
        self.scroll_offset = u16::try_from(clamped).unwrap_or(0);
        self.auto_scroll = self.scroll_offset >= self.max_scroll;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.scroll_offset = self.max_scroll;
    }

    /// Records the layout of the frame being drawn and pins to the bottom
    /// while auto-scroll is on.
    pub fn sync_scroll(&mut self, max_scroll: u16) {
        self.max_scroll = max_scroll;
        if self.auto_scroll || self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn take_submission_leaves_empty_form_untouched() {
        let mut form = InputForm::new();
        form.set_text("   ");
        assert!(form.take_submission().is_none());
        assert_eq!(form.text(), "   ");
    }

    #[test]
    fn take_submission_clears_text_and_attachment() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("foto.png");
        fs::write(&path, b"png").expect("write");

        let mut form = InputForm::new();
        form.set_text("mira esto");
        form.attach(PendingAttachment::from_path(&path).expect("attach"));

        let submission = form.take_submission().expect("submission");
        assert_eq!(submission.text(), Some("mira esto"));
        assert!(submission.attachment().is_some());
        assert!(form.is_text_empty());
        assert!(form.attachment().is_none());
    }

    #[test]
    fn input_height_grows_with_lines_and_caps() {
        let mut form = InputForm::new();
        assert_eq!(form.calculate_height(40), 1);

        form.set_text("uno\ndos\ntres");
        assert_eq!(form.calculate_height(40), 3);

        form.set_text(&"x\n".repeat(20));
        assert_eq!(form.calculate_height(40), MAX_INPUT_ROWS);
    }

    #[test]
    fn newline_insertion_keeps_text_multiline() {
        let mut form = InputForm::new();
        form.insert_str("a");
        form.insert_newline();
        form.insert_str("b");
        assert_eq!(form.text(), "a\nb");
    }

    #[test]
    fn scrolling_up_disables_auto_scroll_until_bottom() {
        let mut ui = UiState::new(Theme::dark_default());
        ui.sync_scroll(10);
        assert_eq!(ui.scroll_offset, 10);

        ui.scroll_by(-3);
        assert_eq!(ui.scroll_offset, 7);
        assert!(!ui.auto_scroll);

        ui.sync_scroll(12);
        assert_eq!(ui.scroll_offset, 7);

        ui.scroll_by(100);
        assert_eq!(ui.scroll_offset, 12);
        assert!(ui.auto_scroll);
    }
}
