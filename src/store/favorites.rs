use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::library::TrackId;

use super::{write_atomic, StoreError};

/// The persisted favorites set.
///
/// On disk this is a flat JSON array of track ids (the ordering carries no
/// meaning). The whole set is loaded once at startup and the whole file is
/// rewritten on every add/remove — there is no dirty-buffering, which is
/// fine at the handful-of-entries scale favorites live at.
#[derive(Debug)]
pub struct Favorites {
    path: PathBuf,
    set: BTreeSet<TrackId>,
}

impl Favorites {
    /// Load favorites from `path`. A missing file yields an empty set; an
    /// unparsable one is reported as [`StoreError::Corrupt`] and the file is
    /// left alone.
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        let set = match fs::read_to_string(&path) {
            Ok(raw) => {
                let ids: Vec<TrackId> =
                    serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
                        path: path.clone(),
                        source: e,
                    })?;
                ids.into_iter().collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        debug!(count = set.len(), path = %path.display(), "favorites loaded");
        Ok(Self { path, set })
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.set.contains(id)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Add `id` to the set and persist. Adding an existing member is a
    /// no-op for the set, but the file is rewritten either way (reference
    /// behavior; the write is byte-identical and atomic).
    pub fn add(&mut self, id: &str) -> Result<bool, StoreError> {
        let changed = self.set.insert(id.to_string());
        self.save()?;
        if changed {
            info!(track = id, "favorited");
        }
        Ok(changed)
    }

    /// Remove `id` from the set and persist. Removing a non-member is a
    /// no-op for the set.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let changed = self.set.remove(id);
        self.save()?;
        if changed {
            info!(track = id, "unfavorited");
        }
        Ok(changed)
    }

    /// Flip membership for `id`; returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StoreError> {
        if self.is_favorite(id) {
            self.remove(id)?;
            Ok(false)
        } else {
            self.add(id)?;
            Ok(true)
        }
    }

    fn save(&self) -> Result<(), StoreError> {
        let ids: Vec<&TrackId> = self.set.iter().collect();
        let raw = serde_json::to_string(&ids).expect("favorites serialize cannot fail");
        write_atomic(&self.path, &raw)
    }
}
