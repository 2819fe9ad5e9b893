//! The terminal event loop: draw, read keys, tick.
//!
//! Input is polled at a short interval so the loop stays responsive; a
//! separate coarse tick (configurable `ui.poll_interval_ms`) drives
//! [`Navigator::poll`] for end-of-track auto-advance and expires status
//! messages. All playback mutations go through the navigator; all view
//! mutations go through the `App`.

use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use crate::app::{App, PickAction, Prompt, View};
use crate::config::Settings;
use crate::library::scan;
use crate::navigator::{Context, Navigator};
use crate::player::RodioEngine;
use crate::store::StoreError;
use crate::ui::{self, Row, RowKey};

const INPUT_POLL: Duration = Duration::from_millis(50);

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    music_dir: &Path,
    app: &mut App,
    nav: &mut Navigator<RodioEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.ui.poll_interval_ms.max(1));
    let mut last_tick = Instant::now();

    loop {
        let rows = ui::build_rows(app, nav);
        app.clamp_selection(rows.len());
        terminal.draw(|f| ui::draw(f, app, nav, &rows, &settings.ui, &settings.controls))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, settings, music_dir, app, nav, &rows);
                }
            }
        }

        if last_tick.elapsed() >= tick {
            nav.poll();
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(
    key: KeyEvent,
    settings: &Settings,
    music_dir: &Path,
    app: &mut App,
    nav: &mut Navigator<RodioEngine>,
    rows: &[Row],
) {
    if app.prompt.is_some() {
        handle_prompt_key(key, app, nav);
        return;
    }

    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Enter => app.exit_filter_mode(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char(c) => app.push_filter_char(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(rows.len()),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(rows.len()),
        KeyCode::Enter => activate_row(app, nav, rows),
        KeyCode::Char(' ') | KeyCode::Char('p') => nav.toggle_play_pause(),
        KeyCode::Char('h') => nav.previous(),
        KeyCode::Char('l') => nav.next(),
        KeyCode::Char('H') => nav.seek_by(-(settings.controls.scrub_seconds as i64)),
        KeyCode::Char('L') => nav.seek_by(settings.controls.scrub_seconds as i64),
        KeyCode::Char('r') => nav.cycle_repeat(),
        KeyCode::Char('s') => nav.toggle_shuffle(),
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('f') => toggle_favorite(app, nav),
        KeyCode::Char('F') => toggle_favorites_view(app, nav),
        KeyCode::Char('b') => app.enter_view(View::Playlists),
        KeyCode::Char('n') => app.open_new_playlist_prompt(),
        KeyCode::Char('a') => open_pick(app, nav, PickAction::AddCurrent),
        KeyCode::Char('x') => open_pick(app, nav, PickAction::RemoveCurrent),
        KeyCode::Char('d') => request_delete(app, rows),
        KeyCode::Char('R') => rescan(app, nav, music_dir, settings),
        KeyCode::Esc => go_back(app),
        _ => {}
    }
}

/// Enter on the highlighted row.
fn activate_row(app: &mut App, nav: &mut Navigator<RodioEngine>, rows: &[Row]) {
    let Some(row) = rows.get(app.selected) else {
        return;
    };

    match &row.key {
        RowKey::Track(i) => {
            // Playing from the library or favorites list re-anchors the
            // navigation context; any active playlist is left behind.
            if app.view == View::Favorites {
                nav.enter_favorites();
            } else {
                nav.exit_to_library();
            }
            nav.select(*i);
        }
        RowKey::Playlist(name) => match nav.enter_playlist(name, None) {
            Ok(true) => app.enter_view(View::PlaylistSongs),
            Ok(false) => app.set_status(format!("no playlist named '{name}'")),
            Err(e) => report_store_error(app, e),
        },
        RowKey::PlaylistSong(i) => nav.select(*i),
    }
}

fn toggle_favorite(app: &mut App, nav: &mut Navigator<RodioEngine>) {
    match nav.toggle_favorite() {
        Ok(Some(true)) => app.set_status("added to favorites"),
        Ok(Some(false)) => app.set_status("removed from favorites"),
        Ok(None) => {}
        Err(e) => report_store_error(app, e),
    }
}

fn toggle_favorites_view(app: &mut App, nav: &mut Navigator<RodioEngine>) {
    if app.view == View::Favorites {
        app.enter_view(View::Library);
        nav.exit_to_library();
    } else {
        app.enter_view(View::Favorites);
        nav.enter_favorites();
    }
}

fn open_pick(app: &mut App, nav: &Navigator<RodioEngine>, action: PickAction) {
    let Some(track) = nav.current_track() else {
        app.set_status("nothing playing");
        return;
    };
    // Removal only makes sense for playlists the track is actually in.
    let names = match action {
        PickAction::AddCurrent => nav.playlists().names(),
        PickAction::RemoveCurrent => nav.playlists().names_containing(&track.id),
    };
    match names {
        Ok(names) => app.open_pick_prompt(action, names),
        Err(e) => report_store_error(app, e),
    }
}

/// `d` in the playlists view asks before deleting.
fn request_delete(app: &mut App, rows: &[Row]) {
    if app.view != View::Playlists {
        return;
    }
    if let Some(Row {
        key: RowKey::Playlist(name),
        ..
    }) = rows.get(app.selected)
    {
        app.open_delete_prompt(name.clone());
    }
}

fn rescan(app: &mut App, nav: &mut Navigator<RodioEngine>, music_dir: &Path, settings: &Settings) {
    match scan(music_dir, &settings.library) {
        Ok(tracks) => {
            let count = tracks.len();
            nav.reload_library(tracks);
            app.enter_view(View::Library);
            app.set_status(format!("library rescanned ({count} tracks)"));
        }
        Err(e) => {
            warn!(error = %e, dir = %music_dir.display(), "rescan failed");
            app.set_status(format!("rescan failed: {e}"));
        }
    }
}

fn go_back(app: &mut App) {
    match app.view {
        View::PlaylistSongs => app.enter_view(View::Playlists),
        View::Playlists | View::Favorites => app.enter_view(View::Library),
        View::Library => app.clear_filter(),
    }
}

fn handle_prompt_key(key: KeyEvent, app: &mut App, nav: &mut Navigator<RodioEngine>) {
    // Decide on a snapshot; prompt mutation helpers borrow `app` again.
    match app.prompt.clone() {
        Some(Prompt::NewPlaylist { input }) => match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.prompt_pop_char(),
            KeyCode::Enter => {
                app.cancel_prompt();
                match nav.playlists().create(input.trim()) {
                    Ok(()) => app.set_status(format!("created '{}'", input.trim())),
                    Err(StoreError::DuplicatePlaylist(name)) => {
                        app.set_status(format!("playlist '{name}' already exists"))
                    }
                    Err(StoreError::EmptyPlaylistName) => {
                        app.set_status("playlist name cannot be empty")
                    }
                    Err(e) => report_store_error(app, e),
                }
            }
            KeyCode::Char(c) => app.prompt_push_char(c),
            _ => {}
        },
        Some(Prompt::PickPlaylist {
            action,
            names,
            selected,
        }) => match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Char('j') | KeyCode::Down => app.pick_next(),
            KeyCode::Char('k') | KeyCode::Up => app.pick_prev(),
            KeyCode::Enter => {
                app.cancel_prompt();
                let name = &names[selected];
                let result = match action {
                    PickAction::AddCurrent => nav.add_current_to_playlist(name),
                    PickAction::RemoveCurrent => nav.remove_current_from_playlist(name),
                };
                match (result, action) {
                    (Ok(true), PickAction::AddCurrent) => {
                        app.set_status(format!("added to '{name}'"))
                    }
                    (Ok(true), PickAction::RemoveCurrent) => {
                        app.set_status(format!("removed from '{name}'"))
                    }
                    (Ok(false), _) => app.set_status("nothing playing"),
                    (Err(e), _) => report_store_error(app, e),
                }
            }
            _ => {}
        },
        Some(Prompt::ConfirmDelete { name }) => match key.code {
            KeyCode::Char('y') => {
                app.cancel_prompt();
                match nav.playlists().delete(&name) {
                    Ok(true) => {
                        // Drop any active context pointing at the dead list.
                        if matches!(nav.context(), Context::Playlist(a) if a.name == name) {
                            nav.exit_to_library();
                        }
                        app.set_status(format!("deleted '{name}'"));
                    }
                    Ok(false) => app.set_status(format!("no playlist named '{name}'")),
                    Err(e) => report_store_error(app, e),
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_prompt(),
            _ => {}
        },
        None => {}
    }
}

fn report_store_error(app: &mut App, err: StoreError) {
    warn!(error = %err, "store operation failed");
    app.set_status(err.to_string());
}
