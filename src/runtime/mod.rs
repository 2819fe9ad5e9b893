//! Startup wiring and terminal lifecycle.
//!
//! `run()` loads settings, initializes file-based logging, scans the
//! library, loads the stores (a corrupt store file aborts startup so the
//! error is shown before the terminal is taken over), builds the
//! engine/session/navigator stack and hands control to the event loop.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::{default_data_dir, RepeatSetting, Settings};
use crate::library::scan;
use crate::navigator::{Navigator, RepeatMode};
use crate::player::{RodioEngine, Session};
use crate::store::{Favorites, PlaylistStore};

mod event_loop;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    settings.validate()?;

    let data_dir = match settings.storage.data_dir.clone().map(PathBuf::from) {
        Some(dir) => dir,
        None => default_data_dir()
            .ok_or("cannot determine a data directory; set HOME or storage.data_dir")?,
    };
    fs::create_dir_all(&data_dir)?;
    let _log_guard = init_logging(&data_dir)?;

    // Music directory: CLI argument wins over config; last resort is the
    // current working directory.
    let music_dir = env::args()
        .nth(1)
        .or_else(|| settings.library.directory.clone())
        .map(PathBuf::from)
        .map_or_else(env::current_dir, Ok)?;

    let tracks = scan(&music_dir, &settings.library)?;

    let favorites = Favorites::load(data_dir.join(&settings.storage.favorites_file))?;
    let playlists = PlaylistStore::new(data_dir.join(&settings.storage.playlists_file));
    // Surface playlist-file corruption now, while stderr is still visible.
    playlists.load_all()?;

    let engine = RodioEngine::new()?;
    let mut nav = Navigator::new(tracks, Session::new(engine), favorites, playlists);
    nav.set_shuffle(settings.playback.shuffle);
    nav.set_repeat(match settings.playback.repeat {
        RepeatSetting::None => RepeatMode::None,
        RepeatSetting::Once => RepeatMode::Once,
        RepeatSetting::Always => RepeatMode::Always,
    });

    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &music_dir, &mut app, &mut nav);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

/// Log to daily-rotated files under `<data_dir>/logs/`; stdout belongs to
/// the TUI. The returned guard must live for the whole run or buffered
/// lines are lost.
fn init_logging(data_dir: &Path) -> io::Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = data_dir.join("logs");
    fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(&log_dir, "vivace.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
