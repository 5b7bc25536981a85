use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Wrapping and scroll arithmetic shared by the transcript and the input box.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Pre-wrap styled lines at word boundaries, breaking tokens wider than
    /// `terminal_width`. Rendering pre-wrapped lines keeps the scroll math in
    /// step with what is drawn.
    pub fn prewrap_lines(lines: &[Line], terminal_width: u16) -> Vec<Line<'static>> {
        let width = terminal_width as usize;
        let mut out: Vec<Line<'static>> = Vec::with_capacity(lines.len());

        for line in lines {
            if line.spans.is_empty() {
                out.push(Line::from(""));
                continue;
            }
            if width == 0 {
                out.push(owned_line(line));
                continue;
            }

            let mut wrapper = LineWrapper::new(width, &mut out);
            for span in &line.spans {
                for ch in span.content.chars() {
                    if ch == ' ' {
                        wrapper.flush_word();
                        wrapper.push_space(span.style);
                    } else {
                        wrapper.push_word_char(ch, span.style);
                    }
                }
            }
            wrapper.finish();
        }

        out
    }

    /// Visual rows `text` occupies when word-wrapped to `width` columns.
    pub fn wrapped_line_count(text: &str, width: u16) -> usize {
        let lines: Vec<Line> = text.split('\n').map(Line::raw).collect();
        Self::prewrap_lines(&lines, width).len()
    }

    pub fn calculate_max_scroll_offset(total_lines: usize, available_height: u16) -> u16 {
        let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
        total.saturating_sub(available_height)
    }
}

fn owned_line(line: &Line) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .iter()
        .map(|s| Span::styled(s.content.to_string(), s.style))
        .collect();
    Line::from(spans)
}

struct LineWrapper<'a> {
    width: usize,
    out: &'a mut Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    cur_len: usize,
    emitted_any: bool,
    // Current word accumulated as styled segments
    word: Vec<(String, Style, usize)>,
    word_len: usize,
}

impl<'a> LineWrapper<'a> {
    fn new(width: usize, out: &'a mut Vec<Line<'static>>) -> Self {
        Self {
            width,
            out,
            spans: Vec::new(),
            cur_len: 0,
            emitted_any: false,
            word: Vec::new(),
            word_len: 0,
        }
    }

    fn emit_line(&mut self) {
        self.out.push(Line::from(std::mem::take(&mut self.spans)));
        self.emitted_any = true;
        self.cur_len = 0;
    }

    fn append_run(&mut self, style: Style, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.style == style {
                let mut combined = last.content.to_string();
                combined.push_str(text);
                *last = Span::styled(combined, style);
                return;
            }
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn push_word_char(&mut self, ch: char, style: Style) {
        let ch_width = ch.width().unwrap_or(0);
        match self.word.last_mut() {
            Some((text, last_style, len)) if *last_style == style => {
                text.push(ch);
                *len += ch_width;
            }
            _ => self.word.push((ch.to_string(), style, ch_width)),
        }
        self.word_len += ch_width;
    }

    fn push_space(&mut self, style: Style) {
        if self.cur_len < self.width {
            self.append_run(style, " ");
            self.cur_len += 1;
        } else {
            // Wrap and drop the leading space
            self.emit_line();
        }
    }

    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        if self.cur_len > 0 && self.cur_len + self.word_len > self.width {
            self.emit_line();
        }

        let segments = std::mem::take(&mut self.word);
        self.word_len = 0;
        for (text, style, _) in segments {
            let mut run = String::new();
            for ch in text.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if self.cur_len + ch_width > self.width && self.cur_len > 0 {
                    self.append_run(style, &run);
                    run.clear();
                    self.emit_line();
                }
                run.push(ch);
                self.cur_len += ch_width;
            }
            self.append_run(style, &run);
        }
    }

    fn finish(mut self) {
        self.flush_word();
        if !self.spans.is_empty() {
            self.emit_line();
        }
        if !self.emitted_any {
            // Preserve a single empty visual line for whitespace-only inputs
            self.out.push(Line::from(""));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = vec![Line::from("hola mundo cruel")];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 10);
        assert_eq!(texts(&wrapped), vec!["hola mundo", "cruel"]);

        let wrapped = ScrollCalculator::prewrap_lines(&lines, 8);
        assert_eq!(texts(&wrapped), vec!["hola ", "mundo ", "cruel"]);
    }

    #[test]
    fn breaks_words_longer_than_width() {
        let lines = vec![Line::from("abcdefghij")];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 4);
        assert_eq!(texts(&wrapped), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wide_characters_count_double() {
        let lines = vec![Line::from("😃😃😃")];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 4);
        assert_eq!(texts(&wrapped), vec!["😃😃", "😃"]);
    }

    #[test]
    fn preserves_styles_across_spans() {
        let bold = Style::default().add_modifier(ratatui::style::Modifier::BOLD);
        let lines = vec![Line::from(vec![
            Span::styled("Tú: ", bold),
            Span::raw("2+2"),
        ])];
        let wrapped = ScrollCalculator::prewrap_lines(&lines, 40);
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].spans[0].style, bold);
        assert_eq!(texts(&wrapped), vec!["Tú: 2+2"]);
    }

    #[test]
    fn empty_and_blank_lines_keep_a_row() {
        let lines = vec![Line::from(""), Line::from("   ")];
        assert_eq!(ScrollCalculator::prewrap_lines(&lines, 10).len(), 2);
    }

    #[test]
    fn counts_rows_for_multiline_text() {
        assert_eq!(ScrollCalculator::wrapped_line_count("uno\ndos", 20), 2);
        assert_eq!(ScrollCalculator::wrapped_line_count("", 20), 1);
        assert_eq!(ScrollCalculator::wrapped_line_count("aaaa bbbb", 5), 2);
    }

    #[test]
    fn max_scroll_never_underflows() {
        assert_eq!(ScrollCalculator::calculate_max_scroll_offset(3, 10), 0);
        assert_eq!(ScrollCalculator::calculate_max_scroll_offset(30, 10), 20);
    }
}
