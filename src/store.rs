//! Persistence for favorites and named playlists.
//!
//! Both stores are whole-document: the entire file is read at load and the
//! entire file is rewritten on every mutation. Files are small, so the
//! rewrite cost does not matter; what does matter is that a crash mid-write
//! never corrupts previously-saved data, so every save goes through
//! [`write_atomic`] (write to a sibling temp file, then rename).
//!
//! A missing file is an empty state, never an error. An unparsable file is
//! a [`StoreError::Corrupt`] surfaced to the user; the file itself is left
//! untouched rather than silently replaced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod favorites;
mod playlists;

pub use favorites::Favorites;
pub use playlists::{Playlist, PlaylistStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is corrupt and was left untouched: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("a playlist named \"{0}\" already exists")]
    DuplicatePlaylist(String),

    #[error("playlist name must not be empty")]
    EmptyPlaylistName,
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Replace `path` with `contents` without ever leaving a half-written file
/// behind: the data goes to a sibling temp file first and only a successful
/// write is renamed into place.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}
