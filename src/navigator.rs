//! The playback-state and playlist-navigation core.
//!
//! [`Navigator`] owns every piece of playback/navigation state (repeat and
//! shuffle modes, the browsing context, the library cursor, the paused flag)
//! together with the library snapshot, the two stores and the engine
//! session. The UI layer issues commands and derives all of its rendering
//! from this state; it never stores mode or position itself.

use rand::Rng;
use tracing::debug;

use crate::library::{Track, TrackId};
use crate::player::{Engine, EngineState, Session};
use crate::store::{Favorites, PlaylistStore, StoreError};

/// Repeat mode, cycled `None -> Once -> Always -> None`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    None,
    /// Replay the current track exactly one more time, then resume normal
    /// advancement. Consumed by the advance that honors it.
    Once,
    /// Replay the current track until toggled off.
    Always,
}

impl RepeatMode {
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::Once,
            Self::Once => Self::Always,
            Self::Always => Self::None,
        }
    }
}

/// A playlist being browsed: the stored songs intersected with the current
/// library (playlist order preserved), plus its own cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePlaylist {
    pub name: String,
    pub songs: Vec<TrackId>,
    pub index: usize,
}

/// Which ordered view of tracks is being navigated.
///
/// `Favorites` is a display filter only: selection resolves to the real
/// library index and next/previous keep whole-library semantics, matching
/// the reference behavior (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Context {
    #[default]
    Library,
    Playlist(ActivePlaylist),
    Favorites,
}

pub struct Navigator<E: Engine> {
    tracks: Vec<Track>,
    session: Session<E>,
    favorites: Favorites,
    playlists: PlaylistStore,
    repeat: RepeatMode,
    shuffle: bool,
    context: Context,
    /// Index of the current track in `tracks`, regardless of context.
    current: usize,
    paused: bool,
}

impl<E: Engine> Navigator<E> {
    pub fn new(
        tracks: Vec<Track>,
        session: Session<E>,
        favorites: Favorites,
        playlists: PlaylistStore,
    ) -> Self {
        Self {
            tracks,
            session,
            favorites,
            playlists,
            repeat: RepeatMode::default(),
            shuffle: false,
            context: Context::default(),
            current: 0,
            paused: false,
        }
    }

    // ---- accessors -------------------------------------------------------

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn active_playlist(&self) -> Option<&ActivePlaylist> {
        match &self.context {
            Context::Playlist(active) => Some(active),
            _ => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn playlists(&self) -> &PlaylistStore {
        &self.playlists
    }

    pub fn session(&self) -> &Session<E> {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut Session<E> {
        &mut self.session
    }

    // ---- mode toggles ----------------------------------------------------

    pub fn cycle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
    }

    pub fn toggle_shuffle(&mut self) {
        // No interaction with the cursor: the next advance picks it up.
        self.shuffle = !self.shuffle;
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    // ---- selection and advancement ---------------------------------------

    /// Play the track at `idx` within the active context's sequence.
    ///
    /// In a playlist context `idx` indexes the active playlist; elsewhere it
    /// is a library index (the favorites view hands in real library
    /// indices). Out-of-range requests and an empty library are no-ops.
    pub fn select(&mut self, idx: usize) {
        if self.tracks.is_empty() {
            return;
        }

        let lib_idx = match &mut self.context {
            Context::Playlist(active) => {
                if idx >= active.songs.len() {
                    return;
                }
                let id = &active.songs[idx];
                // Active songs are intersected with the library at entry,
                // but the library may have been rescanned since.
                let Some(i) = self.tracks.iter().position(|t| &t.id == id) else {
                    return;
                };
                active.index = idx;
                i
            }
            _ => {
                if idx >= self.tracks.len() {
                    return;
                }
                idx
            }
        };

        self.current = lib_idx;
        self.paused = false;
        if let Err(e) = self.session.start(&self.tracks[lib_idx]) {
            self.session.report(e);
        }
    }

    /// Advance to the next track.
    ///
    /// Inside a playlist, repeat mode is ignored entirely and the playlist's
    /// own order is advanced. Outside one, `Once` replays the current track
    /// and resets itself, `Always` replays indefinitely, and `None` moves
    /// sequentially (or uniformly at random under shuffle).
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }

        if let Context::Playlist(active) = &self.context {
            if active.songs.is_empty() {
                return;
            }
            let len = active.songs.len();
            let idx = if self.shuffle {
                rand::thread_rng().gen_range(0..len)
            } else {
                (active.index + 1) % len
            };
            self.select(idx);
            return;
        }

        match self.repeat {
            RepeatMode::Once => {
                self.repeat = RepeatMode::None;
                self.select(self.current);
            }
            RepeatMode::Always => self.select(self.current),
            RepeatMode::None => {
                let len = self.tracks.len();
                let idx = if self.shuffle {
                    rand::thread_rng().gen_range(0..len)
                } else {
                    (self.current + 1) % len
                };
                self.select(idx);
            }
        }
    }

    /// Go back one track. Context-sensitive like [`Self::next`], but repeat
    /// mode is never consulted.
    pub fn previous(&mut self) {
        if self.tracks.is_empty() {
            return;
        }

        if let Context::Playlist(active) = &self.context {
            if active.songs.is_empty() {
                return;
            }
            let len = active.songs.len();
            let idx = if self.shuffle {
                rand::thread_rng().gen_range(0..len)
            } else {
                (active.index + len - 1) % len
            };
            self.select(idx);
            return;
        }

        let len = self.tracks.len();
        let idx = if self.shuffle {
            rand::thread_rng().gen_range(0..len)
        } else {
            (self.current + len - 1) % len
        };
        self.select(idx);
    }

    pub fn toggle_play_pause(&mut self) {
        if self.session.is_playing() {
            self.session.pause();
            self.paused = true;
        } else if self.paused && self.session.state() == EngineState::Paused {
            self.session.play();
            self.paused = false;
        } else {
            // Nothing loaded yet (or playback ran out): start from the
            // current cursor of whichever context is active.
            let idx = match &self.context {
                Context::Playlist(active) => active.index,
                _ => self.current,
            };
            self.select(idx);
        }
    }

    /// The ~1 s tick. End-of-track is detected only here, by polling the
    /// engine; a detected end drives the same advancement as a manual next.
    pub fn poll(&mut self) {
        if self.session.state() == EngineState::Ended {
            debug!("track ended, auto-advancing");
            self.next();
        }
    }

    // ---- seeking ---------------------------------------------------------

    /// Seek to an absolute position (seconds). Fire-and-forget.
    pub fn seek_to(&mut self, secs: u64) {
        self.session.seek_secs(secs);
    }

    /// Scrub forward/backward, clamped at the start of the track.
    pub fn seek_by(&mut self, delta_secs: i64) {
        let pos = self.session.position().as_secs() as i64;
        let target = (pos + delta_secs).max(0) as u64;
        self.session.seek_secs(target);
    }

    // ---- contexts --------------------------------------------------------

    /// Browse the named playlist: intersect its stored songs with the
    /// current library (playlist order, missing tracks dropped silently) and
    /// put the cursor on `selected` when given. Returns `false` when no
    /// playlist has that name.
    pub fn enter_playlist(
        &mut self,
        name: &str,
        selected: Option<&str>,
    ) -> Result<bool, StoreError> {
        let Some(pl) = self.playlists.find(name)? else {
            return Ok(false);
        };

        let songs: Vec<TrackId> = pl
            .songs
            .into_iter()
            .filter(|id| self.tracks.iter().any(|t| &t.id == id))
            .collect();
        let index = selected
            .and_then(|id| songs.iter().position(|s| s == id))
            .unwrap_or(0);

        self.context = Context::Playlist(ActivePlaylist {
            name: pl.name,
            songs,
            index,
        });
        Ok(true)
    }

    /// Back to the whole library; the library cursor is preserved.
    pub fn exit_to_library(&mut self) {
        self.context = Context::Library;
    }

    pub fn enter_favorites(&mut self) {
        self.context = Context::Favorites;
    }

    // ---- favorites and playlist membership (keyed by current track) ------

    /// Flip the favorite flag of the current track. `Ok(None)` when nothing
    /// is current (empty library).
    pub fn toggle_favorite(&mut self) -> Result<Option<bool>, StoreError> {
        let Some(id) = self.current_track().map(|t| t.id.clone()) else {
            return Ok(None);
        };
        self.favorites.toggle(&id).map(Some)
    }

    pub fn add_current_to_playlist(&self, name: &str) -> Result<bool, StoreError> {
        match self.current_track() {
            Some(t) => {
                self.playlists.add_track(&t.id, name)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_current_from_playlist(&self, name: &str) -> Result<bool, StoreError> {
        match self.current_track() {
            Some(t) => {
                self.playlists.remove_track(&t.id, name)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ---- rescan ----------------------------------------------------------

    /// Swap in a freshly scanned library. The current track is re-found by
    /// id when it survived the rescan; otherwise the cursor resets. Any
    /// playlist/favorites context is dropped back to the whole library.
    pub fn reload_library(&mut self, tracks: Vec<Track>) {
        let current_id = self.current_track().map(|t| t.id.clone());
        self.tracks = tracks;
        self.context = Context::Library;
        self.current = current_id
            .and_then(|id| self.tracks.iter().position(|t| t.id == id))
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests;
