//! The widget shell: panel toggling and the event loop.

use crate::api::ChatClient;
use crate::config::Config;
use crate::conversation::ConversationController;
use crate::tui::{self, AppEvent, EventHandler, Tui};
use crate::ui::chat::{ChatPanel, Composer, ComposerResult, Launcher};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Clear,
};

const PANEL_WIDTH: u16 = 44;
const PANEL_HEIGHT: u16 = 22;
const COMPOSER_HEIGHT: u16 = 3;

pub async fn run(config: Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = App::new(&config).run(&mut terminal).await;
    tui::restore()?;
    result
}

struct App {
    controller: ConversationController,
    client: ChatClient,
    composer: Composer,
    open: bool,
    running: bool,
    tick: usize,
}

impl App {
    fn new(config: &Config) -> Self {
        Self {
            controller: ConversationController::new(),
            client: ChatClient::new(config),
            composer: Composer::new(),
            open: false,
            running: true,
            tick: 0,
        }
    }

    async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut events = EventHandler::new();
        self.draw(terminal)?;

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                AppEvent::Key(key) => self.handle_key(key),
                AppEvent::Resize => {}
                AppEvent::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                    // Keeps polling while the panel is closed: an in-flight
                    // request still lands in the log.
                    self.controller.poll_reply();
                }
            }

            self.draw(terminal)?;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.open = !self.open;
            }
            KeyCode::Esc if self.open => {
                self.open = false;
            }
            KeyCode::Esc => {
                self.running = false;
            }
            _ if self.open => {
                match self.composer.handle_key(key, &mut self.controller) {
                    ComposerResult::Submitted => {
                        // Dropped silently while busy or when the draft is
                        // blank; the composer keeps its text in that case.
                        if self.controller.submit(&self.client) {
                            self.composer.reset();
                        }
                    }
                    ComposerResult::None => {}
                }
            }
            _ => {}
        }
    }

    fn draw(&mut self, terminal: &mut Tui) -> Result<()> {
        terminal.draw(|frame| {
            let area = frame.size();

            if !self.open {
                let label_width = Launcher::LABEL.chars().count() as u16 + 4;
                let launcher_area = bottom_right(area, label_width.min(area.width), 1);
                frame.render_widget(Launcher, launcher_area);
                return;
            }

            let panel_area = bottom_right(
                area,
                PANEL_WIDTH.min(area.width.saturating_sub(2)),
                PANEL_HEIGHT.min(area.height.saturating_sub(1)),
            );
            frame.render_widget(Clear, panel_area);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(3),
                    Constraint::Length(COMPOSER_HEIGHT),
                ])
                .split(panel_area);

            frame.render_widget(
                ChatPanel::new(
                    self.controller.messages(),
                    self.controller.is_busy(),
                    self.tick,
                ),
                chunks[0],
            );
            self.composer.render(
                self.controller.draft(),
                self.controller.is_busy(),
                chunks[1],
                frame.buffer_mut(),
            );
        })?;

        Ok(())
    }
}

/// Anchor a rect to the bottom-right corner, one cell in from the edge.
fn bottom_right(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.right().saturating_sub(width + 1).max(area.x),
        y: area.bottom().saturating_sub(height + 1).max(area.y),
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_hugs_the_corner() {
        let screen = Rect::new(0, 0, 80, 24);
        let rect = bottom_right(screen, 44, 22);
        assert_eq!(rect.right(), 79);
        assert_eq!(rect.bottom(), 23);
        assert_eq!(rect.width, 44);
    }

    #[test]
    fn panel_never_leaves_the_screen() {
        let screen = Rect::new(0, 0, 10, 5);
        let rect = bottom_right(screen, 44, 22);
        assert!(rect.width <= screen.width);
        assert!(rect.height <= screen.height);
        assert!(rect.x >= screen.x && rect.y >= screen.y);
    }
}
