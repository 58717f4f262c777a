//! Screen layout (tab bar, status bar, player regions)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::Tab;
use crate::screen::Visibility;

const TAB_BAR_HEIGHT: u16 = 3;
const STATUS_BAR_HEIGHT: u16 = 1;
const CONTROLS_HEIGHT: u16 = 5;

/// Tab bar, content and status bar. Immersive chrome gives everything to the content.
pub fn split_screen(area: Rect, immersive: bool) -> (Option<Rect>, Rect, Option<Rect>) {
    if immersive {
        return (None, area, None);
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    (Some(chunks[0]), chunks[1], Some(chunks[2]))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerRegions {
    /// Where the picture would be; taps land here
    pub surface: Rect,
    pub controls: Option<Rect>,
    pub seek_bar: Option<Rect>,
}

pub fn player_regions(area: Rect, visibility: Visibility) -> PlayerRegions {
    if !visibility.controls_visible() || area.height <= CONTROLS_HEIGHT {
        return PlayerRegions {
            surface: area,
            controls: None,
            seek_bar: None,
        };
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(CONTROLS_HEIGHT)])
        .split(area);
    let seek_bar = Rect {
        height: 3,
        ..chunks[1]
    };

    PlayerRegions {
        surface: chunks[0],
        controls: Some(chunks[1]),
        seek_bar: Some(seek_bar),
    }
}

pub fn render_tab_bar(frame: &mut Frame, area: Rect, active: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" car-media ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(tabs, area);
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, status: &str) {
    let line = Line::from(vec![
        Span::styled(format!(" {}", status), Style::default().fg(Color::Cyan)),
        Span::styled("   h: help  q: quit", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
