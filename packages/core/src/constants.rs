use std::env;
use std::path::PathBuf;

/// Get the path to the Taskdeck directory (~/.taskdeck)
pub fn taskdeck_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".taskdeck")
    } else {
        // Fall back to dirs crate for normal usage
        dirs::home_dir()
            .expect("Unable to get home directory")
            .join(".taskdeck")
    }
}

/// Get the path to the SQLite database file (~/.taskdeck/taskdeck.db)
pub fn database_file() -> PathBuf {
    taskdeck_dir().join("taskdeck.db")
}

/// Get the path to the persisted filter snapshot (~/.taskdeck/filters.json)
pub fn filter_snapshot_file() -> PathBuf {
    taskdeck_dir().join("filters.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taskdeck_dir_respects_home() {
        let tmp = tempfile::tempdir().unwrap();
        let old_home = env::var("HOME").ok();
        env::set_var("HOME", tmp.path());

        assert_eq!(taskdeck_dir(), tmp.path().join(".taskdeck"));
        assert_eq!(database_file(), tmp.path().join(".taskdeck/taskdeck.db"));

        match old_home {
            Some(h) => env::set_var("HOME", h),
            None => env::remove_var("HOME"),
        }
    }
}
