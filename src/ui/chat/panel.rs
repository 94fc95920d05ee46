//! Conversation display component

use crate::conversation::Message;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Renders the message log and the typing indicator. User messages sit on
/// the right, assistant messages on the left; the newest lines win when
/// space runs out.
pub struct ChatPanel<'a> {
    messages: &'a [Message],
    busy: bool,
    tick: usize,
}

impl<'a> ChatPanel<'a> {
    pub fn new(messages: &'a [Message], busy: bool, tick: usize) -> Self {
        Self {
            messages,
            busy,
            tick,
        }
    }
}

impl Widget for ChatPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" 小粉助手 ")
            .style(Style::default().fg(Color::Magenta));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height == 0 {
            return;
        }

        let mut all_lines: Vec<Line> = Vec::new();
        for message in self.messages {
            all_lines.extend(message_lines(message, inner.width));
            all_lines.push(Line::raw(""));
        }

        if self.busy {
            all_lines.push(typing_indicator(self.tick));
        }

        // Anchor to the bottom: show the tail that fits.
        let height = inner.height as usize;
        let start = all_lines.len().saturating_sub(height);
        let visible: Vec<Line> = all_lines.split_off(start);

        Paragraph::new(Text::from(visible)).render(inner, buf);
    }
}

/// Wrapped, aligned lines for a single message.
fn message_lines(message: &Message, width: u16) -> Vec<Line<'static>> {
    let (alignment, style) = if message.is_user {
        (Alignment::Right, Style::default().fg(Color::Blue))
    } else {
        (Alignment::Left, Style::default().fg(Color::White))
    };

    wrap_text(&message.text, width.saturating_sub(2) as usize)
        .into_iter()
        .map(|line| {
            Line::from(Span::styled(line, style)).alignment(alignment)
        })
        .collect()
}

/// The three-dot indicator shown while a reply is outstanding.
fn typing_indicator(tick: usize) -> Line<'static> {
    let dots = match tick / 3 % 3 {
        0 => "●",
        1 => "●●",
        _ => "●●●",
    };
    Line::from(Span::styled(
        dots.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Left)
}

/// Wrap text to a cell budget, breaking inside runs when there is no
/// whitespace to break on (CJK answers usually have none).
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for c in raw_line.chars() {
            let w = cell_width(c);
            if current_width + w > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
                if c == ' ' {
                    continue;
                }
            }
            current.push(c);
            current_width += w;
        }
        lines.push(current);
    }

    lines
}

/// Display-cell estimate: treat everything outside ASCII as wide. Close
/// enough for padding a chat bubble.
fn cell_width(c: char) -> usize {
    if c.is_ascii() { 1 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_text("hello", 20), vec!["hello"]);
    }

    #[test]
    fn ascii_wraps_at_the_budget() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wide_characters_cost_two_cells() {
        let lines = wrap_text("机甲大师", 4);
        assert_eq!(lines, vec!["机甲", "大师"]);
    }

    #[test]
    fn newlines_are_preserved() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn leading_space_after_break_is_dropped() {
        let lines = wrap_text("aaaa bbbb", 4);
        assert_eq!(lines, vec!["aaaa", "bbbb"]);
    }
}
