//! Input line for composing a question.

use crate::conversation::ConversationController;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

const PLACEHOLDER: &str = "输入你的问题...";

/// What a key press amounted to.
#[derive(Debug, PartialEq, Eq)]
pub enum ComposerResult {
    /// The user asked to send the draft.
    Submitted,
    None,
}

/// Edits the controller's draft and tracks the cursor. The text itself
/// lives in the controller so the draft survives panel close/reopen.
pub struct Composer {
    cursor: usize,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Apply one key press to the draft. Typing stays enabled while a
    /// request is outstanding; only sending is gated, elsewhere.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        controller: &mut ConversationController,
    ) -> ComposerResult {
        let draft = controller.draft().to_string();
        let char_count = draft.chars().count();
        self.cursor = self.cursor.min(char_count);

        match key.code {
            KeyCode::Enter => return ComposerResult::Submitted,
            KeyCode::Char(c) => {
                let mut next = draft;
                next.insert(byte_index(&next, self.cursor), c);
                controller.update_draft(next);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let mut next = draft;
                    next.remove(byte_index(&next, self.cursor - 1));
                    controller.update_draft(next);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < char_count {
                    let mut next = draft;
                    next.remove(byte_index(&next, self.cursor));
                    controller.update_draft(next);
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor < char_count {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = char_count;
            }
            _ => {}
        }

        ComposerResult::None
    }

    /// Called after an accepted submission cleared the draft.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn render(&self, draft: &str, busy: bool, area: Rect, buf: &mut Buffer) {
        let (title, border_style) = if busy {
            (" 发送中... ", Style::default().fg(Color::DarkGray))
        } else {
            (" Enter 发送 · Esc 关闭 ", Style::default().fg(Color::Magenta))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let line = if draft.is_empty() {
            Line::from(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let cursor = self.cursor.min(draft.chars().count());
            let mut content = draft.to_string();
            content.insert(byte_index(&content, cursor), '▌');
            Line::from(Span::styled(content, Style::default().fg(Color::White)))
        };

        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}

/// Byte offset of the given char index, clamped to the end.
fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_builds_the_draft() {
        let mut composer = Composer::new();
        let mut controller = ConversationController::new();

        for c in "hi".chars() {
            composer.handle_key(press(KeyCode::Char(c)), &mut controller);
        }
        assert_eq!(controller.draft(), "hi");
    }

    #[test]
    fn insertion_follows_the_cursor() {
        let mut composer = Composer::new();
        let mut controller = ConversationController::new();

        for c in "ac".chars() {
            composer.handle_key(press(KeyCode::Char(c)), &mut controller);
        }
        composer.handle_key(press(KeyCode::Left), &mut controller);
        composer.handle_key(press(KeyCode::Char('b')), &mut controller);

        assert_eq!(controller.draft(), "abc");
    }

    #[test]
    fn backspace_handles_multibyte_chars() {
        let mut composer = Composer::new();
        let mut controller = ConversationController::new();

        for c in "机甲".chars() {
            composer.handle_key(press(KeyCode::Char(c)), &mut controller);
        }
        composer.handle_key(press(KeyCode::Backspace), &mut controller);

        assert_eq!(controller.draft(), "机");
    }

    #[test]
    fn enter_requests_submission() {
        let mut composer = Composer::new();
        let mut controller = ConversationController::new();
        controller.update_draft("hello");

        assert_eq!(
            composer.handle_key(press(KeyCode::Enter), &mut controller),
            ComposerResult::Submitted
        );
        // The composer itself never mutates the log.
        assert_eq!(controller.messages().len(), 1);
    }

    #[test]
    fn cursor_is_clamped_after_external_draft_change() {
        let mut composer = Composer::new();
        let mut controller = ConversationController::new();

        for c in "hello".chars() {
            composer.handle_key(press(KeyCode::Char(c)), &mut controller);
        }
        controller.update_draft("a");
        composer.handle_key(press(KeyCode::Char('b')), &mut controller);

        assert_eq!(controller.draft(), "ab");
    }
}
