//! UI rendering for the terminal interface.
//!
//! The runtime hands in the view-state (`App`) and the navigator; this
//! module turns them into rows and widgets. `build_rows` is the single
//! source of what the main list shows, so input handling and rendering can
//! never disagree about which row is which.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
    Frame,
};
use tracing::warn;

use crate::app::{App, PickAction, Prompt, View};
use crate::config::{ControlsSettings, UiSettings};
use crate::navigator::{Context, Navigator, RepeatMode};
use crate::player::{Engine, EngineState};

/// What selecting a row means.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowKey {
    /// A library index, valid in library and favorites views.
    Track(usize),
    /// A playlist name, valid in the playlists view.
    Playlist(String),
    /// An index into the active playlist's songs.
    PlaylistSong(usize),
}

/// One visible row of the main list.
pub struct Row {
    pub label: String,
    pub key: RowKey,
}

/// Build the rows of the current view, with the active filter applied.
pub fn build_rows<E: Engine>(app: &App, nav: &Navigator<E>) -> Vec<Row> {
    match app.view {
        View::Library => track_rows(app, nav, |_| true),
        View::Favorites => track_rows(app, nav, |id| nav.favorites().is_favorite(id)),
        View::Playlists => match nav.playlists().names() {
            Ok(names) => names
                .into_iter()
                .filter(|n| app.filter_matches(n))
                .map(|n| Row {
                    label: n.clone(),
                    key: RowKey::Playlist(n),
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "failed to list playlists");
                Vec::new()
            }
        },
        View::PlaylistSongs => {
            let Some(active) = nav.active_playlist() else {
                return Vec::new();
            };
            active
                .songs
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    let display = nav
                        .tracks()
                        .iter()
                        .find(|t| &t.id == id)
                        .map(|t| t.display.clone())
                        .unwrap_or_else(|| id.clone());
                    Row {
                        label: decorate(nav, id, display),
                        key: RowKey::PlaylistSong(i),
                    }
                })
                .collect()
        }
    }
}

fn track_rows<E: Engine>(
    app: &App,
    nav: &Navigator<E>,
    keep: impl Fn(&str) -> bool,
) -> Vec<Row> {
    nav.tracks()
        .iter()
        .enumerate()
        .filter(|(_, t)| keep(&t.id) && app.filter_matches(&t.display))
        .map(|(i, t)| Row {
            label: decorate(nav, &t.id, t.display.clone()),
            key: RowKey::Track(i),
        })
        .collect()
}

/// Prefix a track label with the playing and favorite markers.
fn decorate<E: Engine>(nav: &Navigator<E>, id: &str, display: String) -> String {
    let playing = nav.current_track().is_some_and(|t| t.id == id)
        && nav.session().state() != EngineState::Idle;
    let fav = nav.favorites().is_favorite(id);
    match (playing, fav) {
        (true, true) => format!("> {display} *"),
        (true, false) => format!("> {display}"),
        (false, true) => format!("  {display} *"),
        (false, false) => format!("  {display}"),
    }
}

/// Format whole seconds as `m:ss`; anything negative renders as `0:00`.
pub fn format_time(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::None => "off",
        RepeatMode::Once => "once",
        RepeatMode::Always => "always",
    }
}

fn view_title(app: &App, nav: &Navigator<impl Engine>) -> String {
    match app.view {
        View::Library => " library ".to_string(),
        View::Favorites => " favorites ".to_string(),
        View::Playlists => " playlists ".to_string(),
        View::PlaylistSongs => match nav.active_playlist() {
            Some(active) => format!(" playlist: {} ", active.name),
            None => " playlist ".to_string(),
        },
    }
}

fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the whole UI.
pub fn draw<E: Engine>(
    frame: &mut Frame,
    app: &App,
    nav: &Navigator<E>,
    rows: &[Row],
    ui_settings: &UiSettings,
    controls: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vivace ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, nav, chunks[1]);
    draw_list(frame, app, nav, rows, chunks[2]);
    draw_status(frame, app, nav, chunks[3]);

    let footer_text = format!(
        "[j/k] move | [enter] select | [space/p] play-pause | [h/l] prev/next | \
         [H/L] scrub -/+{}s | [r] repeat | [s] shuffle | [/] filter | [f] fav | \
         [F] favs | [b] playlists | [n] new | [a] add | [x] remove | [R] rescan | \
         [esc] back | [q] quit",
        controls.scrub_seconds
    );
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    if let Some(prompt) = &app.prompt {
        draw_prompt(frame, prompt, chunks[2]);
    }
}

fn draw_now_playing<E: Engine>(frame: &mut Frame, nav: &Navigator<E>, area: Rect) {
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let state = nav.session().state();
    let line = match (nav.current_track(), state) {
        (_, EngineState::Idle) | (None, _) => "nothing playing".to_string(),
        (Some(track), _) => {
            let verb = match state {
                EngineState::Playing => "playing",
                EngineState::Paused => "paused",
                _ => "ended",
            };
            let elapsed = nav.session().position().as_secs() as i64;
            match nav.session().length() {
                Some(len) => format!(
                    "{verb}: {} [{} / {}]",
                    track.display,
                    format_time(elapsed),
                    format_time(len.as_secs() as i64)
                ),
                None => format!("{verb}: {} [{}]", track.display, format_time(elapsed)),
            }
        }
    };

    let par = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" now playing ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(par, inner[0]);

    // Progress gauge only when the engine knows a real length.
    if state != EngineState::Idle {
        if let Some(len) = nav.session().length() {
            let ratio =
                (nav.session().position().as_secs_f64() / len.as_secs_f64()).clamp(0.0, 1.0);
            let gauge = Gauge::default().ratio(ratio).label("");
            frame.render_widget(gauge, inner[1]);
        }
    }
}

fn draw_list<E: Engine>(
    frame: &mut Frame,
    app: &App,
    nav: &Navigator<E>,
    rows: &[Row],
    area: Rect,
) {
    // Window the rows so the highlight stays near the center of the pane.
    let total = rows.len();
    let height = area.height.saturating_sub(2) as usize;
    let sel = app.selected.min(total.saturating_sub(1));
    let (start, end, sel_in_window) = if total <= height || height == 0 {
        (0, total, sel)
    } else {
        let half = height / 2;
        let mut start = sel.saturating_sub(half);
        if start + height > total {
            start = total - height;
        }
        (start, start + height, sel - start)
    };

    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|r| ListItem::new(r.label.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title(app, nav)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(sel_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status<E: Engine>(frame: &mut Frame, app: &App, nav: &Navigator<E>, area: Rect) {
    let text = if let Some(msg) = app.status() {
        msg.to_string()
    } else {
        let mut parts = vec![
            format!("repeat: {}", repeat_label(nav.repeat())),
            format!("shuffle: {}", if nav.shuffle() { "on" } else { "off" }),
        ];
        if let Context::Playlist(active) = nav.context() {
            parts.push(format!("in playlist: {}", active.name));
        }
        let q = app.filter_query.trim();
        if app.filter_mode || !q.is_empty() {
            parts.push(format!("filter: {q}"));
        }
        parts.join(" | ")
    };

    let par = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" status ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(par, area);
}

fn draw_prompt(frame: &mut Frame, prompt: &Prompt, area: Rect) {
    match prompt {
        Prompt::NewPlaylist { input } => {
            let popup = centered_rect_sized(40, 3, area);
            frame.render_widget(Clear, popup);
            let par = Paragraph::new(format!("{input}_")).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" new playlist (enter/esc) ")
                    .padding(Padding::horizontal(1)),
            );
            frame.render_widget(par, popup);
        }
        Prompt::PickPlaylist {
            action,
            names,
            selected,
        } => {
            let height = (names.len() as u16 + 2).min(12);
            let popup = centered_rect_sized(40, height, area);
            frame.render_widget(Clear, popup);

            let title = match action {
                PickAction::AddCurrent => " add to playlist ",
                PickAction::RemoveCurrent => " remove from playlist ",
            };
            let items: Vec<ListItem> = names.iter().map(|n| ListItem::new(n.as_str())).collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default();
            state.select(Some(*selected));
            frame.render_stateful_widget(list, popup, &mut state);
        }
        Prompt::ConfirmDelete { name } => {
            let popup = centered_rect_sized(44, 3, area);
            frame.render_widget(Clear, popup);
            let par = Paragraph::new(format!("delete playlist '{name}'? (y/n)")).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" confirm ")
                    .padding(Padding::horizontal(1)),
            );
            frame.render_widget(par, popup);
        }
    }
}
