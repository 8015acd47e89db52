//! Recursive scanning of watched folders for matching files
//!
//! The scanner walks every watched folder to unbounded depth and collects
//! regular files whose extension is in the requested [`ExtensionSet`].
//! Matching is case-insensitive: `App.EXE` matches `.exe`.
//!
//! Roots that are missing or unreadable do not abort the scan; they are
//! recorded per root in the [`ScanOutcome`] and logged, and the remaining
//! roots are still walked. The match list is materialized eagerly so its
//! length can serve as the progress denominator for a run.

use crate::core::error::Error;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A normalized set of file extensions to match against.
///
/// Entries are stored lower-cased with a leading dot regardless of how the
/// user typed them, so `"exe"`, `".exe"` and `"EXE"` all mean the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    /// Parses a comma-separated extension list as entered by the user,
    /// e.g. `"exe,dll, Bat"` becomes `{".exe", ".dll", ".bat"}`.
    ///
    /// Empty segments are dropped; an input with no usable segment yields
    /// an empty set (which matches nothing).
    pub fn parse(input: &str) -> Self {
        Self(input.split(',').filter_map(normalize_extension).collect())
    }

    /// Returns true if the path's extension is a member of this set.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.0.contains(&format!(".{}", ext.to_ascii_lowercase())))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the normalized entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Normalizes one user-entered extension segment.
///
/// Leading dots and surrounding whitespace are stripped before lower-casing,
/// mirroring what users paste from dialogs ("exe", " .DLL ").
fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_ascii_lowercase()))
}

/// A watched folder that could not be scanned, with the reason it was skipped.
#[derive(Debug, Clone)]
pub struct SkippedRoot {
    pub root: PathBuf,
    pub reason: String,
}

/// Result of scanning a set of watched folders.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Matching files in enumeration order (roots in list order, then walk order).
    pub matches: Vec<PathBuf>,
    /// Roots (or subtrees) that could not be read.
    pub skipped_roots: Vec<SkippedRoot>,
}

/// Walks every root recursively and collects regular files whose extension
/// is in `extensions`.
///
/// An empty extension set short-circuits to an empty outcome without
/// touching the filesystem.
pub fn scan(roots: &[String], extensions: &ExtensionSet) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    if extensions.is_empty() {
        return outcome;
    }

    for root in roots {
        let root_path = Path::new(root);

        match std::fs::metadata(root_path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                warn!("Skipping watched folder {root}: not a directory");
                outcome.skipped_roots.push(SkippedRoot {
                    root: root_path.to_path_buf(),
                    reason: "not a directory".to_string(),
                });
                continue;
            }
            Err(e) => {
                let access = Error::ScanAccess {
                    root: root_path.to_path_buf(),
                    reason: e.to_string(),
                };
                warn!("{access}");
                outcome.skipped_roots.push(SkippedRoot {
                    root: root_path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        }

        for entry in WalkDir::new(root_path) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && extensions.matches(entry.path()) {
                        outcome.matches.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    // Unreadable subtree: record it like an unreadable root and keep walking
                    let failed = e
                        .path()
                        .map_or_else(|| root_path.to_path_buf(), Path::to_path_buf);
                    warn!("Skipping {}: {e}", failed.display());
                    outcome.skipped_roots.push(SkippedRoot {
                        root: failed,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"x").expect("create test file");
    }

    #[test]
    fn test_parse_normalizes_case_and_dots() {
        let set = ExtensionSet::parse("exe,.DLL, Bat ");
        assert_eq!(set.len(), 3);
        let entries: Vec<&str> = set.iter().collect();
        assert_eq!(entries, vec![".bat", ".dll", ".exe"]);
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        let set = ExtensionSet::parse("exe,, ,.");
        assert_eq!(set.len(), 1);
        assert!(set.matches(Path::new("a.exe")));
    }

    #[test]
    fn test_parse_empty_input_matches_nothing() {
        let set = ExtensionSet::parse("");
        assert!(set.is_empty());
        assert!(!set.matches(Path::new("a.exe")));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let set = ExtensionSet::parse("exe");
        assert!(set.matches(Path::new("setup.EXE")));
        assert!(set.matches(Path::new("dir/Setup.Exe")));
        assert!(!set.matches(Path::new("readme.txt")));
        assert!(!set.matches(Path::new("no_extension")));
    }

    #[test]
    fn test_scan_finds_only_matching_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("app.exe"));
        touch(&dir.path().join("readme.txt"));
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested").join("tool.ExE"));
        touch(&dir.path().join("nested").join("notes.md"));

        let roots = vec![dir.path().display().to_string()];
        let outcome = scan(&roots, &ExtensionSet::parse("exe"));

        assert!(outcome.skipped_roots.is_empty());
        assert_eq!(outcome.matches.len(), 2);
        assert!(outcome.matches.iter().any(|p| p.ends_with("app.exe")));
        assert!(outcome.matches.iter().any(|p| p.ends_with("tool.ExE")));
    }

    #[test]
    fn test_scan_empty_extension_set_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("app.exe"));

        let roots = vec![dir.path().display().to_string()];
        let outcome = scan(&roots, &ExtensionSet::default());

        assert!(outcome.matches.is_empty());
        assert!(outcome.skipped_roots.is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_skipped_with_reason() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("app.exe"));

        let roots = vec![
            "/definitely/not/a/real/folder".to_string(),
            dir.path().display().to_string(),
        ];
        let outcome = scan(&roots, &ExtensionSet::parse("exe"));

        // The bad root is recorded but does not block the good one
        assert_eq!(outcome.skipped_roots.len(), 1);
        assert!(!outcome.skipped_roots[0].reason.is_empty());
        assert_eq!(outcome.matches.len(), 1);
    }

    #[test]
    fn test_scan_file_root_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("plain.exe");
        touch(&file);

        let roots = vec![file.display().to_string()];
        let outcome = scan(&roots, &ExtensionSet::parse("exe"));

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.skipped_roots.len(), 1);
        assert_eq!(outcome.skipped_roots[0].reason, "not a directory");
    }

    #[test]
    fn test_scan_worked_example() {
        // One watched folder containing app.exe and readme.txt with {".exe"}
        // yields exactly the exe.
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("app.exe"));
        touch(&dir.path().join("readme.txt"));

        let roots = vec![dir.path().display().to_string()];
        let outcome = scan(&roots, &ExtensionSet::parse("exe"));

        assert_eq!(outcome.matches.len(), 1);
        assert!(outcome.matches[0].ends_with("app.exe"));
    }

    proptest! {
        #[test]
        fn prop_parse_entries_are_dotted_and_lowercase(raw in "[A-Za-z0-9]{1,8}") {
            let set = ExtensionSet::parse(&raw);
            prop_assert_eq!(set.len(), 1);
            for entry in set.iter() {
                prop_assert!(entry.starts_with('.'));
                prop_assert_eq!(entry.to_ascii_lowercase(), entry.to_string());
            }
        }

        #[test]
        fn prop_matches_any_case_variant(ext in "[a-z0-9]{1,6}") {
            let set = ExtensionSet::parse(&ext);
            let upper = format!("file.{}", ext.to_ascii_uppercase());
            let lower = format!("file.{ext}");
            prop_assert!(set.matches(Path::new(&upper)));
            prop_assert!(set.matches(Path::new(&lower)));
        }
    }
}
