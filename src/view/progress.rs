//! Player tab: playback surface, seek bar and controls

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::screen::{PlaybackSnapshot, TapMode, Visibility};
use super::layout::player_regions;
use super::utils::format_duration;

pub fn render_player(
    frame: &mut Frame,
    area: Rect,
    playback: &PlaybackSnapshot,
    visibility: Visibility,
    tap_mode: TapMode,
) {
    let regions = player_regions(area, visibility);
    render_surface(frame, regions.surface, playback, visibility);

    if let (Some(controls), Some(seek_bar)) = (regions.controls, regions.seek_bar) {
        render_seek_bar(frame, seek_bar, playback);

        let hint_area = Rect {
            y: seek_bar.y + seek_bar.height,
            height: controls.height.saturating_sub(seek_bar.height),
            ..controls
        };
        let taps = match tap_mode {
            TapMode::SimpleToggle => "click: show/hide",
            TapMode::GestureSeek => "click: show/hide  double-click left/right: -/+ seek",
        };
        let hint = Paragraph::new(vec![
            Line::from(" Space play/pause   n next   p previous   ←/→ seek").centered(),
            Line::from(taps).centered(),
        ])
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, hint_area);
    }
}

fn render_surface(frame: &mut Frame, area: Rect, playback: &PlaybackSnapshot, visibility: Visibility) {
    let text = match &playback.track {
        Some(track) => {
            let kind = if playback.is_video() { "▣ video" } else { "♪ audio" };
            vec![
                Line::from(""),
                Line::from(track.title.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Line::from(format!("{}  ·  {}", kind, track.extension.to_uppercase())),
            ]
        }
        None => vec![Line::from(""), Line::from("No track playing")],
    };

    let mut block = Block::default();
    // Immersive surface is borderless, as a full-screen picture would be
    if !visibility.is_immersive() {
        block = block.borders(Borders::ALL).title(" Player ");
    }

    let surface = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(block);
    frame.render_widget(surface, area);
}

fn render_seek_bar(frame: &mut Frame, area: Rect, playback: &PlaybackSnapshot) {
    let status_text = match (&playback.track, playback.is_playing) {
        (None, _) => " No track playing".to_string(),
        (Some(track), true) => format!(" ▶ {}", track.name),
        (Some(track), false) => format!(" ⏸  {}", track.name),
    };
    let position_text = match playback.index {
        Some(index) => format!(" {} / {} ", index + 1, playback.track_count),
        None => String::new(),
    };

    let time_str = format!(
        "{} / {}",
        format_duration(playback.position_ms),
        format_duration(playback.duration_ms)
    );

    let progress_ratio = if playback.duration_ms > 0 {
        (playback.position_ms as f64 / playback.duration_ms as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ", status_text))
                .title_bottom(Line::from(position_text).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(progress_ratio)
        .label(time_str);

    frame.render_widget(gauge, area);
}
