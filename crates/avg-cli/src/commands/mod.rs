//! CLI subcommand implementations.

pub mod create;
pub mod delete;
pub mod list;
pub mod push;
pub mod show;

/// Shown whenever the user has nothing to work with yet.
pub(crate) const CREATE_HINT: &str = "Use 'avg create \"<name>\" [\"<description>\"]' to create one.";

#[cfg(test)]
pub(crate) fn temp_store() -> (tempfile::TempDir, avg_store::Store) {
    let temp = tempfile::tempdir().unwrap();
    let store = avg_store::Store::open(temp.path().join("trackers")).unwrap();
    (temp, store)
}
