//! Input validation for user-supplied watch-list entries
//!
//! Watched-folder paths come from dialogs, CLI arguments, and imported
//! documents; they are validated before entering the list so a stray control
//! character cannot end up inside a netsh argument later.

use crate::core::error::Error;

/// Validates and normalizes a watched-folder path entered by the user.
///
/// The path is not required to exist - the scanner skips missing roots with
/// a warning, and users routinely add folders for removable drives.
///
/// # Errors
///
/// Returns `Err` if the path is empty after trimming or contains control
/// characters.
pub fn validate_watched_path(input: &str) -> Result<String, Error> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(Error::Validation {
            field: "path".to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if trimmed.chars().any(char::is_control) {
        return Err(Error::Validation {
            field: "path".to_string(),
            message: "Path contains control characters".to_string(),
        });
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths_pass_through() {
        assert_eq!(
            validate_watched_path("C:\\Program Files\\App").unwrap(),
            "C:\\Program Files\\App"
        );
        assert_eq!(validate_watched_path("/opt/tools").unwrap(), "/opt/tools");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(validate_watched_path("  /opt/tools  ").unwrap(), "/opt/tools");
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(validate_watched_path("").is_err());
        assert!(validate_watched_path("   ").is_err());
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(validate_watched_path("C:\\App\nB").is_err());
        assert!(validate_watched_path("C:\\App\x07").is_err());
    }
}
