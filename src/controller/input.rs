//! Key and mouse event handling

use std::time::Instant;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::model::Tab;
use crate::screen::TapSide;
use crate::session::Direction;
use crate::view::{player_regions, split_screen};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.model.set_should_quit(true);
            return;
        }

        // Error message blocks everything else
        if self.model.ui_state.error_message.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.model.clear_error();
            }
            return;
        }

        if self.model.ui_state.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('?')) {
                self.model.toggle_help();
            }
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.model.set_should_quit(true);
                return;
            }
            KeyCode::Char('h') | KeyCode::Char('?') => {
                self.model.toggle_help();
                return;
            }
            KeyCode::Tab => {
                let tab = self.model.active_tab().next();
                self.switch_tab(tab, now).await;
                return;
            }
            KeyCode::BackTab => {
                let tab = self.model.active_tab().prev();
                self.switch_tab(tab, now).await;
                return;
            }
            KeyCode::Char(c @ '1'..='3') => {
                let tab = Tab::ALL[(c as usize) - ('1' as usize)];
                self.switch_tab(tab, now).await;
                return;
            }
            KeyCode::Char(' ') => {
                self.toggle_play_pause(now).await;
                return;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.play_adjacent(Direction::Next, now).await;
                return;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.play_adjacent(Direction::Previous, now).await;
                return;
            }
            _ => {}
        }

        match self.model.active_tab() {
            Tab::Browser => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.model.browser.move_up(),
                KeyCode::Down | KeyCode::Char('j') => self.model.browser.move_down(),
                KeyCode::Enter => self.activate_browser_entry(now).await,
                KeyCode::Backspace | KeyCode::Esc => self.browser_parent(),
                KeyCode::Char('~') => self.show_roots(),
                _ => {}
            },
            Tab::NowPlaying => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.model.move_now_playing_up(),
                KeyCode::Down | KeyCode::Char('j') => {
                    let count = self.session.lock().await.playlist().len();
                    self.model.move_now_playing_down(count);
                }
                KeyCode::Enter => self.play_now_playing_selected(now).await,
                _ => {}
            },
            Tab::Player => match key.code {
                KeyCode::Left => self.seek_step(-self.seek_step_ms, now).await,
                KeyCode::Right => self.seek_step(self.seek_step_ms, now).await,
                KeyCode::Char('[') => {
                    self.player.tap(now, TapSide::Left).await;
                }
                KeyCode::Char(']') => {
                    self.player.tap(now, TapSide::Right).await;
                }
                KeyCode::Esc => self.switch_tab(Tab::NowPlaying, now).await,
                _ => {}
            },
        }
    }

    /// Clicks on the player surface are taps; the seek bar can be dragged
    pub async fn handle_mouse_event(&mut self, mouse: MouseEvent, now: Instant) {
        if self.model.active_tab() != Tab::Player {
            return;
        }

        let (_, content, _) = split_screen(self.screen_area, self.is_immersive());
        let regions = player_regions(content, self.visibility());
        let position = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(bar) = regions.seek_bar.filter(|bar| bar.contains(position)) {
                    self.seek_dragging = true;
                    self.player.seek_bar_started();
                    self.seek_to_column(bar, mouse.column).await;
                } else if regions.surface.contains(position) {
                    let side = if mouse.column < regions.surface.x + regions.surface.width / 2 {
                        TapSide::Left
                    } else {
                        TapSide::Right
                    };
                    let outcome = self.player.tap(now, side).await;
                    tracing::trace!(?side, ?outcome, "Surface tap");
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.seek_dragging => {
                if let Some(bar) = regions.seek_bar {
                    self.seek_to_column(bar, mouse.column).await;
                }
            }
            MouseEventKind::Up(MouseButton::Left) if self.seek_dragging => {
                self.seek_dragging = false;
                self.player.seek_bar_finished(now);
            }
            _ => {}
        }
    }

    async fn seek_to_column(&mut self, bar: Rect, column: u16) {
        let inner_x = bar.x.saturating_add(1);
        let inner_width = bar.width.saturating_sub(2).max(1);
        let offset = column.saturating_sub(inner_x).min(inner_width);
        let ratio = offset as f64 / inner_width as f64;

        let duration = self.player.snapshot().duration_ms;
        self.player.seek_bar_moved((duration as f64 * ratio) as u64).await;
    }
}
