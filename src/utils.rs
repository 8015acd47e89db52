//! Utility functions for directory management
//!
//! Resolves platform-appropriate configuration and state directories:
//!
//! - Data: persisted watch list (`config.json` and its checksum sidecar)
//! - State: runtime artifacts (run log, audit log)
//!
//! # Environment Variables
//!
//! - `OUTGUARD_DATA_DIR` / `OUTGUARD_STATE_DIR`: override the resolved
//!   locations. Used by the test suite to isolate each test; also useful for
//!   portable installs.

use directories::ProjectDirs;
use std::path::PathBuf;

pub fn get_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("OUTGUARD_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "outguard", "outguard").map(|pd| pd.data_dir().to_path_buf())
}

pub fn get_state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("OUTGUARD_STATE_DIR") {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "outguard", "outguard")
        .and_then(|pd| pd.state_dir().map(std::path::Path::to_path_buf))
}

pub fn ensure_dirs() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::fs::DirBuilder;
        use std::os::unix::fs::DirBuilderExt;

        let mut builder = DirBuilder::new();
        builder.mode(0o700); // User read/write/execute only
        builder.recursive(true);

        if let Some(dir) = get_data_dir() {
            builder.create(dir)?;
        }
        if let Some(dir) = get_state_dir() {
            builder.create(dir)?;
        }
    }

    #[cfg(not(unix))]
    {
        if let Some(dir) = get_data_dir() {
            std::fs::create_dir_all(dir)?;
        }
        if let Some(dir) = get_state_dir() {
            std::fs::create_dir_all(dir)?;
        }
    }

    Ok(())
}
