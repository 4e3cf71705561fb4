// ABOUTME: Durable persistence for the filter snapshot
// ABOUTME: Malformed or missing snapshots fall back to defaults silently

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::state::FilterState;

/// Storage for the serialized filter state. The snapshot is the only
/// durable artifact the controller owns.
pub trait FilterStore {
    /// Load the persisted snapshot, substituting defaults when the
    /// snapshot is absent or unreadable.
    fn load(&self) -> FilterState;

    /// Persist the full filter state
    fn save(&self, state: &FilterState) -> io::Result<()>;
}

/// JSON-file-backed store under the app data directory
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default snapshot location (~/.taskdeck/filters.json)
    pub fn default_location() -> Self {
        Self::new(taskdeck_core::filter_snapshot_file())
    }
}

impl FilterStore for JsonFileStore {
    fn load(&self) -> FilterState {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No filter snapshot at {}: {}", self.path.display(), e);
                return FilterState::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                debug!(
                    "Discarding malformed filter snapshot at {}: {}",
                    self.path.display(),
                    e
                );
                FilterState::default()
            }
        }
    }

    fn save(&self, state: &FilterState) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, contents)
    }
}
