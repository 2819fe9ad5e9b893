use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::library::TrackId;

use super::{write_atomic, StoreError};

/// A named, ordered, duplicate-free list of track ids.
///
/// Serialized as `{"name": ..., "songs": [...]}` — the historical on-disk
/// shape, so existing playlist files keep working.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub songs: Vec<TrackId>,
}

impl Playlist {
    pub fn contains(&self, id: &str) -> bool {
        self.songs.iter().any(|s| s == id)
    }

    /// Append `id` unless already a member; insertion order is preserved.
    fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.songs.push(id.to_string());
        true
    }

    /// Remove `id` if present (membership is unique, so "first occurrence"
    /// and "the occurrence" are the same thing).
    fn remove(&mut self, id: &str) -> bool {
        match self.songs.iter().position(|s| s == id) {
            Some(pos) => {
                self.songs.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Stateless read-modify-write access to the playlists file.
///
/// Every mutating call loads the full collection, edits it in memory and
/// writes the full collection back (pretty-printed, atomically). No caching:
/// the file is the single source of truth between calls.
pub struct PlaylistStore {
    path: PathBuf,
}

impl PlaylistStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the whole collection. Missing file = empty collection.
    pub fn load_all(&self) -> Result<Vec<Playlist>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                source: e,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// Overwrite the whole collection, pretty-printed for hand-editing.
    pub fn save_all(&self, playlists: &[Playlist]) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string_pretty(playlists).expect("playlist serialize cannot fail");
        write_atomic(&self.path, &raw)?;
        debug!(count = playlists.len(), "playlists saved");
        Ok(())
    }

    /// Create an empty playlist. The trimmed name must be non-empty and
    /// unique; violations leave the collection unchanged.
    pub fn create(&self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyPlaylistName);
        }

        let mut playlists = self.load_all()?;
        if playlists.iter().any(|pl| pl.name == name) {
            return Err(StoreError::DuplicatePlaylist(name.to_string()));
        }

        playlists.push(Playlist {
            name: name.to_string(),
            songs: Vec::new(),
        });
        self.save_all(&playlists)?;
        info!(playlist = name, "playlist created");
        Ok(())
    }

    /// Delete the named playlist; returns whether it existed. Confirmation
    /// is the caller's job.
    pub fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let mut playlists = self.load_all()?;
        let before = playlists.len();
        playlists.retain(|pl| pl.name != name);
        let existed = playlists.len() != before;
        self.save_all(&playlists)?;
        if existed {
            info!(playlist = name, "playlist deleted");
        }
        Ok(existed)
    }

    /// Add `id` to the named playlist, creating the playlist with that
    /// single track when no playlist has that name. Adding an existing
    /// member is a no-op for the list, but the collection is rewritten
    /// either way (reference behavior).
    pub fn add_track(&self, id: &str, name: &str) -> Result<(), StoreError> {
        let mut playlists = self.load_all()?;
        match playlists.iter_mut().find(|pl| pl.name == name) {
            Some(pl) => {
                pl.add(id);
            }
            None => playlists.push(Playlist {
                name: name.to_string(),
                songs: vec![id.to_string()],
            }),
        }
        self.save_all(&playlists)
    }

    /// Remove `id` from the named playlist if present; no-op otherwise.
    pub fn remove_track(&self, id: &str, name: &str) -> Result<(), StoreError> {
        let mut playlists = self.load_all()?;
        if let Some(pl) = playlists.iter_mut().find(|pl| pl.name == name) {
            pl.remove(id);
        }
        self.save_all(&playlists)
    }

    pub fn find(&self, name: &str) -> Result<Option<Playlist>, StoreError> {
        Ok(self.load_all()?.into_iter().find(|pl| pl.name == name))
    }

    pub fn names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load_all()?.into_iter().map(|pl| pl.name).collect())
    }

    /// Names of the playlists that contain `id` (for the "remove current
    /// track from..." picker).
    pub fn names_containing(&self, id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|pl| pl.contains(id))
            .map(|pl| pl.name)
            .collect())
    }
}
