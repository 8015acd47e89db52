use std::path::PathBuf;
use thiserror::Error;

/// Core error types for OUTGUARD
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted or imported watch-list document could not be understood
    #[error("Config document error: {0}")]
    ConfigRead(String),

    /// Watch-list persistence failed; always surfaced to the user
    #[error("Failed to write config: {0}")]
    ConfigWrite(#[source] std::io::Error),

    /// A watched folder could not be read during a scan
    #[error("Cannot read watched folder {}: {reason}", .root.display())]
    ScanAccess { root: PathBuf, reason: String },

    /// netsh command execution failed
    #[error("netsh error: {message}")]
    Netsh {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    /// Input validation failed
    #[error("Validation error in {field}: {message}")]
    Validation { field: String, message: String },

    /// Privilege escalation failed
    #[error("Elevation error: {0}")]
    Privilege(String),

    /// A block or unblock run is already active
    #[error("A block or unblock run is already in progress")]
    RunInProgress,

    /// Internal logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Represents a translated error with helpful context
#[derive(Debug, Clone)]
pub struct ErrorTranslation {
    pub user_message: String,
    pub suggestions: Vec<String>,
    pub help_url: Option<String>,
}

impl ErrorTranslation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            user_message: message.into(),
            suggestions: Vec::new(),
            help_url: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, url: impl Into<String>) -> Self {
        self.help_url = Some(url.into());
        self
    }
}

/// Database of netsh error patterns and their translations
pub struct NetshErrorPattern;

impl NetshErrorPattern {
    /// Matches an error message against known patterns and returns a user-friendly translation.
    pub fn match_error(msg: &str) -> ErrorTranslation {
        let lower = msg.to_lowercase();

        // Elevation errors
        if lower.contains("requires elevation") || lower.contains("access is denied") {
            return ErrorTranslation::new("Insufficient permissions to modify firewall rules")
                .with_suggestion("Run from an elevated (administrator) prompt")
                .with_suggestion("OUTGUARD normally relaunches itself elevated; check UAC settings")
                .with_help("https://learn.microsoft.com/windows/security/operating-system-security/network-security/windows-firewall");
        }

        // Missing netsh (non-Windows host, broken PATH)
        if lower.contains("not recognized")
            || lower.contains("command not found")
            || lower.contains("no such file")
        {
            return ErrorTranslation::new("netsh is not available on this system")
                .with_suggestion("Firewall rule management requires the Windows netsh tool")
                .with_suggestion("On other platforms, point OUTGUARD_NETSH_COMMAND at an equivalent");
        }

        // Delete with no matching rule
        if lower.contains("no rules match") {
            return ErrorTranslation::new("No matching firewall rule was found")
                .with_suggestion("The program may never have been blocked, or was unblocked already")
                .with_suggestion("List current rules: netsh advfirewall firewall show rule name=all");
        }

        // Malformed invocation (netsh prints its usage text)
        if lower.contains("usage:") || lower.contains("invalid") {
            return ErrorTranslation::new("netsh rejected the rule arguments")
                .with_suggestion("Check the program path for unusual characters")
                .with_help("https://learn.microsoft.com/windows-server/networking/technologies/netsh/netsh-contexts");
        }

        // Generic fallback
        ErrorTranslation::new(format!("Firewall error: {msg}"))
            .with_suggestion("Check the detailed error message for more information")
            .with_suggestion("Verify the firewall service is running: sc query mpssvc")
    }
}

pub type Result<T> = std::result::Result<T, Error>;
