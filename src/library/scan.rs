use std::io;
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Scan the library directory, creating it first if it does not exist so a
/// cold start with no content is not an error.
///
/// Results are sorted lexicographically by track id. This deliberately
/// diverges from raw directory-listing order, which is OS-dependent and
/// would make index-based track identity unstable across platforms.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> io::Result<Vec<Track>> {
    std::fs::create_dir_all(dir)?;

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if !settings.recursive {
        // Only the root directory itself.
        walker = walker.max_depth(1);
    }

    let mut tracks: Vec<Track> = Vec::new();
    for entry in walker.into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        // The id is the path relative to the library root; for a flat
        // (non-recursive) library that is just the file name.
        let id = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        let display = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&id)
            .to_string();

        debug!(track = %id, "found audio file");
        tracks.push(Track {
            id,
            path: path.to_path_buf(),
            display,
        });
    }

    tracks.sort_by(|a, b| a.id.cmp(&b.id));
    info!(count = tracks.len(), dir = %dir.display(), "library scanned");
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));

        let settings = LibrarySettings {
            extensions: vec![".ogg".into(), "flac".into()],
            ..LibrarySettings::default()
        };
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.FLAC"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    }

    #[test]
    fn scan_creates_missing_directory_and_returns_empty() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("songs");
        assert!(!lib.exists());

        let tracks = scan(&lib, &LibrarySettings::default()).unwrap();
        assert!(tracks.is_empty());
        assert!(lib.is_dir());
    }

    #[test]
    fn scan_filters_non_audio_and_sorts_by_id() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.mp3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("a.mp3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default()).unwrap();
        let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a.mp3", "b.mp3"]);
        assert_eq!(tracks[0].display, "a");
    }

    #[test]
    fn scan_is_flat_unless_recursive_enabled() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let flat = scan(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].id, "root.mp3");

        let settings = LibrarySettings {
            recursive: true,
            ..LibrarySettings::default()
        };
        let deep = scan(dir.path(), &settings).unwrap();
        assert_eq!(deep.len(), 2);
        // Relative path as id for nested files.
        assert!(deep.iter().any(|t| t.id == format!("sub{}child.mp3", std::path::MAIN_SEPARATOR)));
    }
}
