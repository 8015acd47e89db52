//! Watch-list persistence
//!
//! The watched-folder list is stored as `config.json` in the data directory
//! and rewritten wholesale after every list mutation. Loading is lenient: a
//! missing or malformed document yields an empty list (the user simply sees
//! no watched folders), while write failures are always surfaced.

use crate::core::error::{Error, Result};
use crate::utils::get_data_dir;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

pub const CONFIG_FILE: &str = "config.json";

/// The persisted document: an ordered list of watched folders.
///
/// Insertion order is the user-visible list order; duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default)]
    pub paths: Vec<String>,
}

fn checksum_of(json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Saves the watch list to disk using an atomic write pattern.
/// 1. Writes to a temporary file.
/// 2. Sets restrictive permissions (0o600).
/// 3. Atomically renames to the target path.
/// 4. Writes a sha256 sidecar for integrity verification on load.
///
/// # Errors
///
/// Returns [`Error::ConfigWrite`] on any I/O failure, including an
/// unavailable data directory. Write failures are never silently dropped.
pub async fn save_config(config: &WatchConfig) -> Result<()> {
    let Some(dir) = get_data_dir() else {
        return Err(Error::ConfigWrite(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "data directory not available",
        )));
    };
    crate::utils::ensure_dirs().map_err(Error::ConfigWrite)?;

    let json = serde_json::to_string_pretty(config)?;
    let path = dir.join(CONFIG_FILE);
    let temp_path = dir.join("config.json.tmp");

    #[cfg(unix)]
    {
        use tokio::fs::OpenOptions;
        use tokio::io::AsyncWriteExt;

        // Create file with restrictive permissions from the start to prevent
        // race condition where file is briefly world-readable
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600)
            .open(&temp_path)
            .await
            .map_err(Error::ConfigWrite)?;

        file.write_all(json.as_bytes())
            .await
            .map_err(Error::ConfigWrite)?;
        file.sync_all().await.map_err(Error::ConfigWrite)?;
    }

    #[cfg(not(unix))]
    {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(Error::ConfigWrite)?;
        file.write_all(json.as_bytes())
            .await
            .map_err(Error::ConfigWrite)?;
        file.sync_all().await.map_err(Error::ConfigWrite)?;
    }

    tokio::fs::rename(&temp_path, &path)
        .await
        .map_err(Error::ConfigWrite)?;

    let mut checksum_path = path;
    checksum_path.set_extension("json.sha256");
    tokio::fs::write(checksum_path, checksum_of(&json))
        .await
        .map_err(Error::ConfigWrite)?;

    Ok(())
}

/// Loads the watch list from disk, or returns an empty one.
///
/// Missing or malformed state is not an error at startup: the problem is
/// logged and the user starts from an empty list. A checksum sidecar
/// mismatch only warns (the file may have been hand-edited).
pub async fn load_config() -> WatchConfig {
    let Some(dir) = get_data_dir() else {
        return WatchConfig::default();
    };
    let path = dir.join(CONFIG_FILE);

    let json = match tokio::fs::read_to_string(&path).await {
        Ok(json) => json,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Cannot read {}: {e}", path.display());
            }
            return WatchConfig::default();
        }
    };

    let mut checksum_path = path.clone();
    checksum_path.set_extension("json.sha256");
    if let Ok(expected) = tokio::fs::read_to_string(&checksum_path).await {
        let actual = checksum_of(&json);
        if expected.trim() != actual {
            warn!(
                "Watch list checksum mismatch (expected: {}, got: {actual})",
                expected.trim()
            );
            // Don't fail - the config may have been manually edited
        }
    }

    match serde_json::from_str::<WatchConfig>(&json) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring malformed watch list {}: {e}", path.display());
            WatchConfig::default()
        }
    }
}
