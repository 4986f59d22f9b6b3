//! File-backed persistence for roster filter state.
//!
//! The filter state survives between sessions as a small JSON file at a
//! configured path. A missing or corrupt file degrades to defaults -
//! stale presentation state is never worth an error.

use std::path::{Path, PathBuf};

use thiserror::Error;

use vivaha_core::filter::FilterState;

/// Errors raised when persisting filter state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write filter state: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode filter state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load/save/clear for one [`FilterState`] file.
#[derive(Debug, Clone)]
pub struct FilterStore {
    path: PathBuf,
}

impl FilterStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted state; defaults when the file is missing or
    /// unreadable.
    #[must_use]
    pub fn load(&self) -> FilterState {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                if error.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), %error, "failed to read filter state");
                }
                return FilterState::cleared();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|error| {
            tracing::warn!(path = %self.path.display(), %error, "corrupt filter state, using defaults");
            FilterState::cleared()
        })
    }

    /// Persist the state.
    ///
    /// # Errors
    ///
    /// Returns the underlying encode or write failure.
    pub fn save(&self, state: &FilterState) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Remove the persisted state; absent files are fine.
    ///
    /// # Errors
    ///
    /// Returns write failures other than the file already being gone.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivaha_core::filter::RosterView;

    fn scratch_store() -> FilterStore {
        let path = std::env::temp_dir().join(format!(
            "vivaha-filter-test-{}.json",
            uuid::Uuid::new_v4()
        ));
        FilterStore::new(path)
    }

    #[test]
    fn test_round_trip() {
        let store = scratch_store();
        let state = FilterState {
            view: RosterView::NoAction,
            search: Some("sharma".to_string()),
            page: 2,
        };
        store.save(&state).expect("save");
        assert_eq!(store.load(), state);
        store.clear().expect("clear");
    }

    #[test]
    fn test_missing_file_defaults() {
        let store = scratch_store();
        assert_eq!(store.load(), FilterState::cleared());
    }

    #[test]
    fn test_corrupt_file_defaults() {
        let store = scratch_store();
        std::fs::write(store.path(), "{not json").expect("write");
        assert_eq!(store.load(), FilterState::cleared());
        store.clear().expect("clear");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = scratch_store();
        store.clear().expect("first clear");
        store.clear().expect("second clear");
    }
}
