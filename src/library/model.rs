use std::path::PathBuf;

/// A track's identity: its file name (path relative to the library root).
///
/// This is the primary key everywhere — favorites, playlists and the
/// navigator all refer to tracks by id, never by a separate numeric handle.
pub type TrackId = String;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub path: PathBuf,
    /// File name with the extension stripped; what the UI shows.
    pub display: String,
}
