use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::app::App;
use crate::core::message::{TranscriptRole, Turn};
use crate::core::transcript::{Transcript, TranscriptEntry};
use crate::ui::theme::Theme;
use crate::utils::scroll::ScrollCalculator;

const USER_PREFIX: &str = "Tú: ";
const ASSISTANT_PREFIX: &str = "MateTutor: ";
const LOADING_TEXT: &str = "MateTutor está pensando";
const DOT_INTERVAL_MS: u128 = 350;

/// Styled, unwrapped lines for the whole transcript.
pub fn build_transcript_lines(
    transcript: &Transcript,
    theme: &Theme,
    pulse_start: Instant,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in transcript.entries() {
        match entry {
            TranscriptEntry::Turn(turn) => push_turn_lines(&mut lines, turn, theme),
            TranscriptEntry::Loading => {
                let dots = (pulse_start.elapsed().as_millis() / DOT_INTERVAL_MS) % 4;
                lines.push(Line::from(vec![
                    Span::styled(ASSISTANT_PREFIX, theme.assistant_prefix_style),
                    Span::styled(
                        format!("{LOADING_TEXT}{}", ".".repeat(dots as usize)),
                        theme.loading_indicator_style,
                    ),
                ]));
                lines.push(Line::from(""));
            }
        }
    }
    lines
}

fn push_turn_lines(lines: &mut Vec<Line<'static>>, turn: &Turn, theme: &Theme) {
    let (prefix, prefix_style, text_style) = match turn.role {
        TranscriptRole::User => (USER_PREFIX, theme.user_prefix_style, theme.user_text_style),
        TranscriptRole::Assistant => (
            ASSISTANT_PREFIX,
            theme.assistant_prefix_style,
            theme.assistant_text_style,
        ),
        TranscriptRole::AppInfo => ("", theme.app_info_style, theme.app_info_style),
    };

    let mut first = true;
    if let Some(text) = turn.text.as_deref() {
        for raw in text.split('\n') {
            let mut spans = Vec::with_capacity(2);
            if first && !prefix.is_empty() {
                spans.push(Span::styled(prefix, prefix_style));
            }
            spans.push(Span::styled(raw.to_string(), text_style));
            lines.push(Line::from(spans));
            first = false;
        }
    }

    if let Some(image) = &turn.image {
        let mut spans = Vec::with_capacity(2);
        if first {
            spans.push(Span::styled(prefix, prefix_style));
        }
        spans.push(Span::styled(
            format!("🖼 {}", image.label()),
            theme.attachment_style,
        ));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    app.ui.last_term_size = area.as_size();
    let theme = app.ui.theme.clone();

    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        area,
    );

    let input_height = app.input_area_height(area.width) + 2;
    let badge_height = u16::from(app.ui.input.attachment().is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(badge_height),
            Constraint::Length(input_height),
        ])
        .split(area);

    draw_title(f, app, &theme, chunks[0]);
    draw_transcript(f, app, &theme, chunks[1]);
    draw_status(f, app, &theme, chunks[2]);
    if badge_height > 0 {
        draw_attachment_badge(f, app, &theme, chunks[3]);
    }
    draw_input(f, app, &theme, chunks[4]);
}

fn draw_title(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(app.title(), theme.title_style)));
    f.render_widget(title, area);
}

fn draw_transcript(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let lines = build_transcript_lines(&app.ui.transcript, theme, app.ui.pulse_start);
    let wrapped = ScrollCalculator::prewrap_lines(&lines, area.width);
    let max_scroll = ScrollCalculator::calculate_max_scroll_offset(wrapped.len(), area.height);
    app.ui.sync_scroll(max_scroll);

    let paragraph = Paragraph::new(wrapped).scroll((app.ui.scroll_offset, 0));
    f.render_widget(paragraph, area);
}

fn draw_status(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let text = match (&app.ui.status, app.ui.is_streaming) {
        (Some(status), _) => status.clone(),
        (None, true) => "Esc cancela la respuesta".to_string(),
        (None, false) => "/help para ver comandos · Ctrl+C para salir".to_string(),
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text, theme.status_style))),
        area,
    );
}

fn draw_attachment_badge(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let Some(attachment) = app.ui.input.attachment() else {
        return;
    };
    let badge = Line::from(vec![
        Span::styled(
            format!("📎 {}", attachment.image_ref().label()),
            theme.attachment_style,
        ),
        Span::styled("  (Ctrl+X para quitar)", theme.status_style),
    ]);
    f.render_widget(Paragraph::new(badge), area);
}

fn draw_input(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let title = if app.ui.is_streaming {
        "Respondiendo… (Esc cancela)"
    } else {
        "Escribe tu pregunta (Enter envía · Shift+Enter nueva línea)"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(title, theme.input_title_style));

    let textarea = app.ui.input.textarea_mut();
    textarea.set_block(block);
    textarea.set_style(theme.input_text_style);
    textarea.set_cursor_style(theme.input_cursor_style);
    textarea.set_cursor_line_style(theme.input_cursor_line_style);
    f.render_widget(&*textarea, area);
}
