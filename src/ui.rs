//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads state: the session view, the decoded envelope and the `App` model.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::config::Settings;
use crate::engine::Waveform;
use crate::session::{AudioSession, LoadState, UNKNOWN_ARTIST};

const UNKNOWN_TITLE: &str = "Unknown Title";

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "open file".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("s".to_string(), "stop".to_string());
    map.insert("r".to_string(), "restart".to_string());
    // h/l is filled dynamically from config.
    map.insert("K".to_string(), "metadata".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = ["j/k", "enter", "space/p", "s", "r", "h/l", "K", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "h/l" {
                Some(format!("[h/l] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format a byte count with a binary unit.
fn human_size(len: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = len as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", len, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Title and artist to show in the header, with placeholders.
fn header_title(session: &AudioSession) -> (String, String) {
    let Some(meta) = session.metadata() else {
        return (UNKNOWN_TITLE.to_string(), UNKNOWN_ARTIST.to_string());
    };
    let title = if meta.title.trim().is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        meta.title.clone()
    };
    let artist = if meta.artist.trim().is_empty() {
        UNKNOWN_ARTIST.to_string()
    } else {
        meta.artist.clone()
    };
    (title, artist)
}

/// Transport state plus elapsed/total time.
fn transport_text(session: &AudioSession) -> String {
    let info = session.playback();
    match session.load_state() {
        LoadState::Empty => "No file".to_string(),
        LoadState::Loading => "Loading...".to_string(),
        LoadState::Failed { .. } => "Unplayable".to_string(),
        LoadState::Ready => {
            let state = if info.is_playing { "Playing" } else { "Paused" };
            format!(
                "{} {} / {}",
                state,
                format_mmss(info.position),
                format_mmss(info.duration)
            )
        }
    }
}

fn cover_text(session: &AudioSession) -> String {
    match session.metadata().and_then(|m| m.cover.as_ref()) {
        Some(cover) => format!("Cover: {} ({})", cover.mime(), human_size(cover.len())),
        None => "Cover: none".to_string(),
    }
}

/// Rows `[start, end)` filled by a bar of `peak` in a box of `height` rows,
/// centred vertically.
fn bar_rows(peak: f32, height: usize) -> (usize, usize) {
    let mut filled = (peak.clamp(0.0, 1.0) * height as f32).round() as usize;
    if peak > 0.0 && filled == 0 {
        filled = 1;
    }
    let filled = filled.min(height);
    let start = (height - filled) / 2;
    (start, start + filled)
}

/// Number of columns that lie before the playhead.
fn played_columns(position: Duration, duration: Duration, width: usize) -> usize {
    if duration.is_zero() {
        return 0;
    }
    let frac = (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0);
    ((frac * width as f64).floor() as usize).min(width)
}

fn waveform_lines(peaks: &[f32], height: usize, played: usize) -> Vec<Line<'static>> {
    let bars: Vec<(usize, usize)> = peaks.iter().map(|&p| bar_rows(p, height)).collect();
    let played = played.min(bars.len());
    (0..height)
        .map(|row| {
            let cell = |&(start, end): &(usize, usize)| if row >= start && row < end { '█' } else { ' ' };
            let head: String = bars[..played].iter().map(cell).collect();
            let tail: String = bars[played..].iter().map(cell).collect();
            Line::from(vec![
                Span::styled(head, Style::default().fg(Color::Cyan)),
                Span::styled(tail, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect()
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn centered_message(msg: &str, style: Style, height: u16) -> Paragraph<'_> {
    let mut lines: Vec<Line> = (0..height.saturating_sub(1) / 2).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(msg, style)));
    Paragraph::new(lines).alignment(Alignment::Center)
}

fn draw_waveform(frame: &mut Frame, area: Rect, session: &AudioSession, waveform: Option<&Waveform>) {
    let block = Block::default().borders(Borders::ALL).title(" waveform ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(Color::DarkGray);
    let body = match (session.load_state(), waveform) {
        (LoadState::Empty, _) => centered_message("Pick an audio file and press enter", dim, inner.height),
        (LoadState::Loading, _) => centered_message("Decoding...", dim, inner.height),
        (LoadState::Failed { .. }, _) => centered_message(
            session.failure().unwrap_or("Cannot decode this file"),
            Style::default().fg(Color::Red),
            inner.height,
        ),
        (LoadState::Ready, None) => centered_message("No waveform", dim, inner.height),
        (LoadState::Ready, Some(wave)) => {
            let width = inner.width as usize;
            let info = session.playback();
            let peaks = wave.resample(width);
            let played = played_columns(info.position, info.duration, width);
            Paragraph::new(waveform_lines(&peaks, inner.height as usize, played))
        }
    };
    frame.render_widget(body, inner);
}

fn draw_picker(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.root {
        Some(root) => format!(" files: {} ", root.display()),
        None => " files ".to_string(),
    };

    // Center the selected item when possible by creating a visible window.
    let total = app.entries.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.selected.min(total.saturating_sub(1));
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    if !app.has_entries() {
        let empty = Paragraph::new("No audio files here")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app.entries[start..end]
        .iter()
        .map(|e| ListItem::new(e.name.as_str()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .events
        .iter()
        .map(|ev| {
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(ev.color)),
                Span::raw(ev.name.as_str()),
            ]))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" events "));
    frame.render_widget(list, area);
}

fn metadata_text(session: &AudioSession) -> String {
    let Some(source) = session.source() else {
        return "No file loaded".to_string();
    };
    let (title, artist) = header_title(session);
    let album = session
        .metadata()
        .map(|m| m.album.as_str())
        .unwrap_or("-");
    let duration = match session.load_state() {
        LoadState::Ready => format_mmss(session.playback().duration),
        _ => "-".to_string(),
    };
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\n{}\nDuration: {}\nFile: {} ({}, {})",
        title,
        artist,
        album,
        cover_text(session),
        duration,
        source.name,
        source.mime,
        human_size(source.len())
    )
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    session: &AudioSession,
    waveform: Option<&Waveform>,
    settings: &Settings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header: now-loaded file and transport
    let (title, artist) = header_title(session);
    let mut second = vec![Span::raw(transport_text(session)), Span::raw(" • "), Span::raw(cover_text(session))];
    if let Some(status) = &app.status {
        second.push(Span::raw(" • "));
        second.push(Span::styled(status.as_str(), Style::default().fg(Color::Yellow)));
    }
    let header = Paragraph::new(vec![
        Line::from(vec![Span::raw(title).bold(), Span::raw("  "), Span::raw(artist)]),
        Line::from(second),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(left_pad())
            .title(settings.ui.header_text.as_str())
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(header, chunks[0]);

    draw_waveform(frame, chunks[1], session, waveform);

    if settings.ui.show_events {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(chunks[2]);
        draw_picker(frame, body[0], app);
        draw_events(frame, body[1], app);
    } else {
        draw_picker(frame, chunks[2], app);
    }

    // Overlay metadata popup
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 9, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let meta = Paragraph::new(metadata_text(session))
            .block(
                Block::default()
                    .padding(left_pad())
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta, popup_area);
    }

    let footer = Paragraph::new(controls_text(settings.controls.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_includes_scrub_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[h/l] scrub -/+7s"));
        assert!(text.starts_with("[j/k] up/down"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn format_mmss_pads() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_millis(61_900)), "01:01");
    }

    #[test]
    fn human_size_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(3 * 1024 * 1024 / 2), "1.5 MiB");
    }

    #[test]
    fn bar_rows_is_centred() {
        assert_eq!(bar_rows(1.0, 6), (0, 6));
        assert_eq!(bar_rows(0.5, 6), (1, 4));
        assert_eq!(bar_rows(0.0, 6), (3, 3));
        // Any audible peak gets at least one row.
        assert_eq!(bar_rows(0.01, 6), (2, 3));
    }

    #[test]
    fn played_columns_tracks_progress() {
        let d = Duration::from_secs(10);
        assert_eq!(played_columns(Duration::ZERO, d, 40), 0);
        assert_eq!(played_columns(Duration::from_secs(5), d, 40), 20);
        assert_eq!(played_columns(Duration::from_secs(99), d, 40), 40);
        assert_eq!(played_columns(Duration::from_secs(5), Duration::ZERO, 40), 0);
    }

    #[test]
    fn waveform_lines_split_at_playhead() {
        let lines = waveform_lines(&[1.0, 1.0, 0.0], 2, 1);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "█");
        assert_eq!(lines[0].spans[1].content, "█ ");
    }

    #[test]
    fn empty_session_shows_placeholders() {
        let session = AudioSession::empty();
        assert_eq!(
            header_title(&session),
            (UNKNOWN_TITLE.to_string(), UNKNOWN_ARTIST.to_string())
        );
        assert_eq!(transport_text(&session), "No file");
        assert_eq!(cover_text(&session), "Cover: none");
        assert_eq!(metadata_text(&session), "No file loaded");
    }

    #[test]
    fn centered_rect_fits_inside() {
        let outer = Rect {
            x: 0,
            y: 0,
            width: 40,
            height: 10,
        };
        let r = centered_rect_sized(72, 9, outer);
        assert_eq!(r.width, 38);
        assert_eq!(r.height, 8);
        assert_eq!(r.x, 1);
        assert_eq!(r.y, 1);
    }
}
