//! TOML import/export of watch lists
//!
//! The interchange format is a human-editable TOML document with the same
//! logical shape as the persisted config:
//!
//! ```toml
//! paths = ["C:\\AppA", "D:\\Games\\Foo"]
//! ```
//!
//! Import parses the whole document before anything is replaced, so a
//! malformed file leaves the in-memory list untouched.

use crate::config::WatchConfig;
use crate::core::error::{Error, Result};
use std::io::Write;
use std::path::Path;

/// Reads a TOML watch-list document and returns its paths.
///
/// # Errors
///
/// Returns [`Error::ConfigRead`] for an unreadable or malformed document;
/// the caller's list is not modified in that case.
pub async fn import_paths(path: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::ConfigRead(format!("cannot read {}: {e}", path.display())))?;

    let doc: WatchConfig = toml::from_str(&text)
        .map_err(|e| Error::ConfigRead(format!("malformed document {}: {e}", path.display())))?;

    Ok(doc.paths)
}

/// Writes the current watch list as a TOML document, atomically
/// (temp file in the target directory, then rename).
///
/// # Errors
///
/// Returns [`Error::ConfigWrite`] on any I/O failure.
pub async fn export_paths(path: &Path, paths: &[String]) -> Result<()> {
    let doc = WatchConfig {
        paths: paths.to_vec(),
    };
    let text = toml::to_string_pretty(&doc)
        .map_err(|e| Error::Internal(format!("TOML serialization failed: {e}")))?;

    // Temp file lives next to the target so the final rename never crosses
    // a filesystem boundary
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut temp = match parent {
        Some(parent) => tempfile::NamedTempFile::new_in(parent),
        None => tempfile::NamedTempFile::new_in("."),
    }
    .map_err(Error::ConfigWrite)?;

    temp.write_all(text.as_bytes()).map_err(Error::ConfigWrite)?;
    temp.flush().map_err(Error::ConfigWrite)?;
    temp.persist(path).map_err(|e| Error::ConfigWrite(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_export_then_import_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("watch.toml");
        let paths = vec!["C:\\AppA".to_string(), "/opt/tools".to_string()];

        export_paths(&file, &paths).await.expect("export");
        let imported = import_paths(&file).await.expect("import");

        assert_eq!(imported, paths);
    }

    #[tokio::test]
    async fn test_import_malformed_document_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("broken.toml");
        std::fs::write(&file, "paths = [unclosed").unwrap();

        let result = import_paths(&file).await;
        assert!(matches!(result, Err(Error::ConfigRead(_))));
    }

    #[tokio::test]
    async fn test_import_missing_file_fails() {
        let result = import_paths(Path::new("/no/such/watch.toml")).await;
        assert!(matches!(result, Err(Error::ConfigRead(_))));
    }

    #[tokio::test]
    async fn test_import_wrong_value_type_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("wrong.toml");
        std::fs::write(&file, "paths = \"not-a-list\"").unwrap();

        let result = import_paths(&file).await;
        assert!(matches!(result, Err(Error::ConfigRead(_))));
    }

    #[tokio::test]
    async fn test_import_missing_paths_key_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("empty.toml");
        std::fs::write(&file, "# nothing here\n").unwrap();

        let imported = import_paths(&file).await.expect("import");
        assert!(imported.is_empty());
    }
}
