//! Collapsed state of the widget, standing in for the floating button.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct Launcher;

impl Launcher {
    pub const LABEL: &'static str = " 💬 小粉助手 · Tab 打开 ";
}

impl Widget for Launcher {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(Span::styled(
            Self::LABEL,
            Style::default().fg(Color::White).bg(Color::Magenta),
        ));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
