//! Storage layer for avg.
//!
//! Trackers live in a single directory, one plain-text file per tracker,
//! named after the tracker. See [`avg_core::Tracker`] for the file format.
//!
//! # Concurrency
//!
//! There is no locking. Two processes pushing to the same tracker at once can
//! lose one of the updates. Every write goes through a hidden temporary file
//! that is then linked or renamed into place, so a reader never observes a
//! half-written tracker.
//!
//! # Hidden files
//!
//! Entries whose names start with `.` are never trackers ([`TrackerName`]
//! rejects them) and are skipped when listing. Temporary files use that
//! namespace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use avg_core::{FormatError, Tracker, TrackerName, ValidationError};
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store holds no trackers.
    #[error("You have no trackers.")]
    NoTrackers,
    /// `create` was given a name that is already taken.
    #[error("Tracker with name '{0}' already exists.")]
    AlreadyExists(TrackerName),
    /// The named tracker does not exist.
    #[error("There is no such tracker '{0}'.")]
    NotFound(TrackerName),
    /// `push` was called without samples.
    #[error("no values to push")]
    NoValues,
    /// A tracker file could not be parsed.
    #[error("tracker '{name}' is malformed: {source}")]
    Malformed {
        name: TrackerName,
        #[source]
        source: FormatError,
    },
    /// Input rejected by core validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// An error from the filesystem.
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A directory of tracker files.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Opens the store at `root`, creating the directory if necessary.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(StoreError::io(&root))?;
        tracing::debug!(root = %root.display(), "opened tracker store");
        Ok(Self { root })
    }

    /// Returns the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file backing a tracker.
    pub fn tracker_path(&self, name: &TrackerName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Hidden scratch file used while writing a tracker.
    fn tmp_path(&self, name: &TrackerName) -> PathBuf {
        self.root.join(format!(".{name}.tmp"))
    }

    /// Lists every tracker, sorted by name.
    ///
    /// Returns [`StoreError::NoTrackers`] when the store is empty.
    pub fn list(&self) -> Result<Vec<Tracker>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(StoreError::io(&self.root))?;

        let mut trackers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(StoreError::io(&self.root))?;
            let path = entry.path();

            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::warn!(path = %path.display(), "skipping non UTF-8 file name");
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            // Follows symlinks so linked tracker files still count.
            if !fs::metadata(&path).is_ok_and(|m| m.is_file()) {
                tracing::debug!(path = %path.display(), "skipping non-file entry");
                continue;
            }
            let Ok(name) = TrackerName::new(file_name) else {
                tracing::warn!(path = %path.display(), "skipping file with invalid tracker name");
                continue;
            };

            trackers.push(Self::read(name, &path)?);
        }

        if trackers.is_empty() {
            return Err(StoreError::NoTrackers);
        }

        trackers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(trackers)
    }

    /// Loads a single tracker.
    pub fn get(&self, name: &TrackerName) -> Result<Tracker, StoreError> {
        let path = self.tracker_path(name);
        Self::read(name.clone(), &path)
    }

    /// Creates a tracker with value 0.
    ///
    /// The file is written under a hidden name and hard-linked into place, so
    /// the tracker either appears complete or not at all. Fails without
    /// touching the existing file if the name is taken.
    pub fn create(
        &self,
        name: TrackerName,
        description: Option<&str>,
    ) -> Result<Tracker, StoreError> {
        let tracker = Tracker::new(name, description)?;
        let path = self.tracker_path(&tracker.name);
        let tmp = self.tmp_path(&tracker.name);

        if let Err(e) = fs::write(&tmp, tracker.render()) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&tmp)(e));
        }
        let linked = fs::hard_link(&tmp, &path);
        let _ = fs::remove_file(&tmp);
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(tracker.name));
            }
            Err(e) => return Err(StoreError::io(&path)(e)),
        }

        tracing::info!(tracker = %tracker.name, "created tracker");
        Ok(tracker)
    }

    /// Removes a tracker.
    pub fn delete(&self, name: &TrackerName) -> Result<(), StoreError> {
        let path = self.tracker_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(tracker = %name, "deleted tracker");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.clone()))
            }
            Err(e) => Err(StoreError::io(&path)(e)),
        }
    }

    /// Folds `samples` into a tracker's running mean and saves it.
    ///
    /// Nothing is written unless the tracker exists and parses.
    pub fn push(&self, name: &TrackerName, samples: &[f64]) -> Result<Tracker, StoreError> {
        if samples.is_empty() {
            return Err(StoreError::NoValues);
        }

        let mut tracker = self.get(name)?;
        tracker.push(samples)?;
        self.save(&tracker)?;

        tracing::info!(
            tracker = %name,
            pushed = samples.len(),
            value = tracker.value,
            count = tracker.count,
            "pushed values"
        );
        Ok(tracker)
    }

    fn read(name: TrackerName, path: &Path) -> Result<Tracker, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name));
            }
            Err(e) => return Err(StoreError::io(path)(e)),
        };
        Tracker::parse(name.clone(), &content)
            .map_err(|source| StoreError::Malformed { name, source })
    }

    /// Replaces a tracker file via a temporary file and rename.
    fn save(&self, tracker: &Tracker) -> Result<(), StoreError> {
        let path = self.tracker_path(&tracker.name);
        let tmp = self.tmp_path(&tracker.name);

        fs::write(&tmp, tracker.render()).map_err(StoreError::io(&tmp))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(&path)(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn name(s: &str) -> TrackerName {
        TrackerName::new(s).unwrap()
    }

    fn open_temp() -> (TempDir, Store) {
        let temp = tempfile::tempdir().unwrap();
        let store = Store::open(temp.path().join("avg/trackers")).unwrap();
        (temp, store)
    }

    #[test]
    fn test_open_creates_directory() {
        let (temp, store) = open_temp();
        assert!(temp.path().join("avg/trackers").is_dir());
        assert_eq!(store.root(), temp.path().join("avg/trackers"));
    }

    #[test]
    fn test_list_empty_store_fails() {
        let (_temp, store) = open_temp();
        assert!(matches!(store.list(), Err(StoreError::NoTrackers)));
    }

    #[test]
    fn test_create_then_list_shows_zero() {
        let (_temp, store) = open_temp();
        store.create(name("coffee"), Some("Cups per day")).unwrap();

        let trackers = store.list().unwrap();
        assert_eq!(trackers.len(), 1);
        assert_eq!(trackers[0].name.as_str(), "coffee");
        assert_eq!(trackers[0].description, "Cups per day");
        assert_eq!(trackers[0].value.to_string(), "0");
    }

    #[test]
    fn test_create_writes_two_line_file() {
        let (_temp, store) = open_temp();
        store.create(name("coffee"), None).unwrap();

        let content = fs::read_to_string(store.tracker_path(&name("coffee"))).unwrap();
        assert_eq!(content, "(No description)\n0\n");
    }

    #[test]
    fn test_create_duplicate_leaves_original() {
        let (_temp, store) = open_temp();
        store.create(name("coffee"), Some("original")).unwrap();
        let path = store.tracker_path(&name("coffee"));
        let before = fs::read_to_string(&path).unwrap();

        let err = store.create(name("coffee"), Some("replacement")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(ref n) if n.as_str() == "coffee"));
        assert_eq!(err.to_string(), "Tracker with name 'coffee' already exists.");
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_create_rejects_multiline_description() {
        let (_temp, store) = open_temp();
        let err = store.create(name("coffee"), Some("a\nb")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::MultilineDescription)
        ));
        assert!(!store.tracker_path(&name("coffee")).exists());
    }

    #[test]
    fn test_delete_removes_file() {
        let (_temp, store) = open_temp();
        store.create(name("coffee"), None).unwrap();
        store.delete(&name("coffee")).unwrap();

        assert!(!store.tracker_path(&name("coffee")).exists());
        assert!(matches!(store.list(), Err(StoreError::NoTrackers)));
    }

    #[test]
    fn test_delete_missing_fails() {
        let (_temp, store) = open_temp();
        let err = store.delete(&name("ghost")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(err.to_string(), "There is no such tracker 'ghost'.");
    }

    #[test]
    fn test_push_updates_mean_and_count() {
        let (_temp, store) = open_temp();
        store.create(name("sleep"), Some("Hours slept")).unwrap();

        let tracker = store.push(&name("sleep"), &[2.0, 4.0]).unwrap();
        assert_eq!(tracker.count, 2);

        let tracker = store.push(&name("sleep"), &[6.0]).unwrap();
        assert_eq!(tracker.count, 3);

        let content = fs::read_to_string(store.tracker_path(&name("sleep"))).unwrap();
        assert_eq!(content, "Hours slept\n4\n3\n");
    }

    #[test]
    fn test_create_failed_write_leaves_no_tracker() {
        let (_temp, store) = open_temp();
        // A directory squatting on the scratch name makes the write fail.
        fs::create_dir(store.root().join(".coffee.tmp")).unwrap();

        let err = store.create(name("coffee"), None).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!store.tracker_path(&name("coffee")).exists());
        assert!(matches!(store.list(), Err(StoreError::NoTrackers)));

        fs::remove_dir(store.root().join(".coffee.tmp")).unwrap();
        store.create(name("coffee"), None).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_leaves_no_temp_files() {
        let (_temp, store) = open_temp();
        store.create(name("coffee"), None).unwrap();
        let _ = store.create(name("coffee"), None).unwrap_err();

        let names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["coffee"]);
    }

    #[test]
    fn test_push_extreme_values_keeps_store_readable() {
        let (_temp, store) = open_temp();
        store.create(name("extremes"), None).unwrap();
        store.create(name("other"), None).unwrap();

        let tracker = store.push(&name("extremes"), &[1.7e308, -1.7e308]).unwrap();
        assert!(tracker.value.is_finite());
        assert_eq!(tracker.count, 2);

        let content = fs::read_to_string(store.tracker_path(&name("extremes"))).unwrap();
        assert_eq!(content, "(No description)\n0\n2\n");
        assert_eq!(store.get(&name("extremes")).unwrap().count, 2);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_push_missing_tracker_fails() {
        let (_temp, store) = open_temp();
        let err = store.push(&name("ghost"), &[1.0]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(!store.tracker_path(&name("ghost")).exists());
    }

    #[test]
    fn test_push_without_values_leaves_file() {
        let (_temp, store) = open_temp();
        store.create(name("sleep"), None).unwrap();

        let err = store.push(&name("sleep"), &[]).unwrap_err();
        assert!(matches!(err, StoreError::NoValues));

        let content = fs::read_to_string(store.tracker_path(&name("sleep"))).unwrap();
        assert_eq!(content, "(No description)\n0\n");
    }

    #[test]
    fn test_push_leaves_no_temp_files() {
        let (_temp, store) = open_temp();
        store.create(name("sleep"), None).unwrap();
        store.push(&name("sleep"), &[8.0]).unwrap();

        let names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["sleep"]);
    }

    #[test]
    fn test_list_sorted_and_skips_hidden() {
        let (_temp, store) = open_temp();
        store.create(name("zeta"), None).unwrap();
        store.create(name("alpha"), None).unwrap();
        fs::write(store.root().join(".alpha.tmp"), "junk").unwrap();
        fs::create_dir(store.root().join("subdir")).unwrap();

        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_malformed_file_reported() {
        let (_temp, store) = open_temp();
        fs::write(store.root().join("broken"), "only one line\n").unwrap();

        let err = store.get(&name("broken")).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert!(err.to_string().starts_with("tracker 'broken' is malformed"));
        assert!(matches!(store.list(), Err(StoreError::Malformed { .. })));
    }
}
