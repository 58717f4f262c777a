//! Main content area rendering (browser and Now Playing lists)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{BrowserEntry, BrowserState, NowPlaying};
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_browser(frame: &mut Frame, area: Rect, browser: &BrowserState, playing_path: Option<&std::path::Path>) {
    let title = match browser.location() {
        Some(path) => format!(" {} ", path.display()),
        None => " Storage ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    if let Some(path) = browser.loading() {
        let loading = Paragraph::new(format!("Scanning {}...", path.display()))
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if browser.entries().is_empty() {
        let empty = Paragraph::new("No folders or media files here")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let info_width = 12;
    let name_width = content_width.saturating_sub(2 + 3 + info_width);
    let selected = browser.selected_index();

    let items: Vec<ListItem> = browser
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_playing = playing_path.is_some_and(|p| p == entry.path());
            let (icon, info, base) = match entry {
                BrowserEntry::Folder(folder) => (
                    "▸",
                    if browser.location().is_none() {
                        String::new()
                    } else {
                        format!("{} files", folder.media_file_count)
                    },
                    Style::default().fg(Color::Yellow),
                ),
                BrowserEntry::File(track) => (
                    if track.is_video() { "▣" } else { "♪" },
                    track.formatted_size(),
                    Style::default(),
                ),
            };

            let style = if i == selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_playing {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                base
            };

            ListItem::new(format!(
                "{} {}   {:>info_width$}",
                icon,
                truncate_string(entry.name(), name_width),
                info,
                info_width = info_width
            ))
            .style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, selected, block);
}

pub fn render_now_playing(frame: &mut Frame, area: Rect, now_playing: &NowPlaying, selected_index: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Now Playing ({} tracks) ", now_playing.tracks.len()))
        .padding(Padding::horizontal(1))
        .border_style(Style::default().fg(Color::Green));

    if now_playing.tracks.is_empty() {
        let empty = Paragraph::new("Nothing loaded. Pick a file in the browser.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let num_width = calculate_num_width(now_playing.tracks.len());
    let content_width = area.width.saturating_sub(4) as usize;
    let title_width = content_width.saturating_sub(1 + num_width + 3 + 3 + 8);

    let items: Vec<ListItem> = now_playing
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_current = now_playing.current == Some(i);
            let style = if i == selected_index {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let marker = match (is_current, now_playing.is_playing) {
                (true, true) => "▶",
                (true, false) => "⏸",
                _ => " ",
            };
            let kind = if track.is_video() { "video" } else { "audio" };

            ListItem::new(format!(
                "{}{:<num_width$}   {}   {:>8}",
                marker,
                i + 1,
                truncate_string(&track.title, title_width),
                kind,
                num_width = num_width
            ))
            .style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, selected_index, block);
}
