use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataLoadError;
use super::loader;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Memoized loader
// ---------------------------------------------------------------------------

/// What the cached dataset was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    path: PathBuf,
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Result<Self, DataLoadError> {
        let meta = std::fs::metadata(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Fingerprint {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Keeps the last loaded [`Dataset`] for the lifetime of the session.
///
/// A cached dataset is returned until the path changes, the file's
/// modification time or length changes, or [`invalidate`](Self::invalidate)
/// is called. A failed reload leaves the previous entry in place.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(Fingerprint, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `path`, loading it only if needed.
    pub fn get(&mut self, path: &Path) -> Result<Arc<Dataset>, DataLoadError> {
        let fingerprint = Fingerprint::of(path)?;

        if let Some((cached, dataset)) = &self.entry {
            if *cached == fingerprint {
                log::debug!("Dataset cache hit for {}", path.display());
                return Ok(Arc::clone(dataset));
            }
        }

        let dataset = Arc::new(loader::load(path)?);
        self.entry = Some((fingerprint, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Drop the cached dataset so the next [`get`](Self::get) reloads.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("Dataset cache invalidated");
        }
    }

    /// Path of the cached dataset, if any.
    pub fn cached_path(&self) -> Option<&Path> {
        self.entry.as_ref().map(|(fp, _)| fp.path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "Date,Product,Region,Quantity,Total\n{body}").unwrap();
        path
    }

    #[test]
    fn returns_same_arc_until_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "sales.csv", "2024-01-05,P1,R1,2,20\n");

        let mut cache = DatasetCache::new();
        let first = cache.get(&path).unwrap();
        let second = cache.get(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.cached_path(), Some(path.as_path()));

        // Length change is detected even when mtime granularity is coarse.
        write_csv(dir.path(), "sales.csv", "2024-01-05,P1,R1,2,20\n2024-01-06,P2,R1,1,15\n");
        let third = cache.get(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "sales.csv", "2024-01-05,P1,R1,2,20\n");

        let mut cache = DatasetCache::new();
        let first = cache.get(&path).unwrap();
        cache.invalidate();
        assert_eq!(cache.cached_path(), None);
        let second = cache.get(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn failed_reload_keeps_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_csv(dir.path(), "good.csv", "2024-01-05,P1,R1,2,20\n");
        let bad = write_csv(dir.path(), "bad.csv", "not-a-date,P1,R1,2,20\n");

        let mut cache = DatasetCache::new();
        cache.get(&good).unwrap();
        assert!(cache.get(&bad).is_err());
        assert!(cache.get(&dir.path().join("missing.csv")).is_err());
        assert_eq!(cache.cached_path(), Some(good.as_path()));
    }
}
