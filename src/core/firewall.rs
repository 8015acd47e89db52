//! Outbound-block rule application via the Windows advanced firewall
//!
//! Every rule this tool manages carries the fixed name [`RULE_NAME`] and is
//! keyed by program path, so one `netsh advfirewall` invocation handles one
//! file:
//!
//! - block: `netsh advfirewall firewall add rule name=OutguardBlock dir=out
//!   program=<path> action=block`
//! - unblock: `netsh advfirewall firewall delete rule name=OutguardBlock
//!   program=<path>` (removes every rule matching name and program)
//!
//! Arguments are passed as a vector, never through a shell, so program paths
//! with spaces or metacharacters cannot change the command.
//!
//! # Environment Variables
//!
//! - `OUTGUARD_NETSH_COMMAND`: substitute program to spawn instead of
//!   `netsh`. Used by the test suite to point at a mock script; also lets
//!   non-Windows hosts plug in an equivalent rule manager.
//!
//! # Failure Reporting
//!
//! A non-zero exit is never swallowed: it becomes [`Error::Netsh`] carrying
//! the captured output and exit code, which the pipeline records per file.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Name stamped on every firewall rule created by this tool.
///
/// The delete operation matches on this name plus the program path, so
/// repeated block runs that accumulated duplicate rules are all removed by
/// one unblock run.
pub const RULE_NAME: &str = "OutguardBlock";

/// Whether a run adds or removes outbound-block rules.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum Direction {
    /// Add an outbound-block rule per matched file
    #[strum(serialize = "block")]
    Block,
    /// Delete the outbound-block rule(s) per matched file
    #[strum(serialize = "unblock")]
    Unblock,
}

/// Resolves the program to spawn for firewall operations.
pub(crate) fn netsh_program() -> String {
    std::env::var("OUTGUARD_NETSH_COMMAND").unwrap_or_else(|_| "netsh".to_string())
}

/// Builds the netsh argument vector for one rule operation.
pub fn rule_args(program: &Path, direction: Direction) -> Vec<String> {
    let program = program.display().to_string();
    match direction {
        Direction::Block => vec![
            "advfirewall".into(),
            "firewall".into(),
            "add".into(),
            "rule".into(),
            format!("name={RULE_NAME}"),
            "dir=out".into(),
            format!("program={program}"),
            "action=block".into(),
        ],
        Direction::Unblock => vec![
            "advfirewall".into(),
            "firewall".into(),
            "delete".into(),
            "rule".into(),
            format!("name={RULE_NAME}"),
            format!("program={program}"),
        ],
    }
}

/// Adds or removes the outbound-block rule for a single program.
///
/// # Errors
///
/// Returns `Err` if:
/// - the netsh process cannot be spawned
/// - netsh exits non-zero (captured stdout/stderr and exit code are attached)
pub async fn apply_rule(path: &Path, direction: Direction) -> Result<()> {
    let args = rule_args(path, direction);

    let output = tokio::process::Command::new(netsh_program())
        .args(&args)
        .output()
        .await
        .map_err(|e| Error::Internal(format!("Failed to spawn netsh: {e}")))?;

    if output.status.success() {
        debug!("{direction} rule applied for {}", path.display());
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // netsh reports most failures on stdout, not stderr
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let message = if stderr.is_empty() { stdout } else { stderr.clone() };
        warn!(
            "netsh {direction} failed for {}: {message}",
            path.display()
        );
        Err(Error::Netsh {
            message,
            stderr: if stderr.is_empty() { None } else { Some(stderr) },
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_helpers::{ENV_VAR_MUTEX, write_mock_netsh};
    use std::path::PathBuf;

    #[test]
    fn test_block_args_shape() {
        let args = rule_args(Path::new("C:\\AppA\\app.exe"), Direction::Block);
        assert_eq!(
            args,
            vec![
                "advfirewall",
                "firewall",
                "add",
                "rule",
                "name=OutguardBlock",
                "dir=out",
                "program=C:\\AppA\\app.exe",
                "action=block",
            ]
        );
    }

    #[test]
    fn test_unblock_args_shape() {
        let args = rule_args(Path::new("C:\\AppA\\app.exe"), Direction::Unblock);
        assert_eq!(
            args,
            vec![
                "advfirewall",
                "firewall",
                "delete",
                "rule",
                "name=OutguardBlock",
                "program=C:\\AppA\\app.exe",
            ]
        );
    }

    #[test]
    fn test_args_keep_spaces_in_program_path() {
        let args = rule_args(Path::new("/opt/My App/tool.exe"), Direction::Block);
        assert!(args.contains(&"program=/opt/My App/tool.exe".to_string()));
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Block.to_string(), "block");
        assert_eq!(Direction::Unblock.to_string(), "unblock");
    }

    #[tokio::test]
    async fn test_apply_rule_success_with_mock() {
        let _guard = ENV_VAR_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().expect("tempdir");
        let log = dir.path().join("calls.log");
        let mock = write_mock_netsh(
            dir.path(),
            &format!("printf '%s\\n' \"$*\" >> '{}'", log.display()),
        );
        unsafe {
            std::env::set_var("OUTGUARD_NETSH_COMMAND", &mock);
        }

        let result = apply_rule(Path::new("/tmp/app.exe"), Direction::Block).await;

        unsafe {
            std::env::remove_var("OUTGUARD_NETSH_COMMAND");
        }

        assert!(result.is_ok());
        let logged = std::fs::read_to_string(&log).expect("mock log");
        assert!(logged.contains("add rule name=OutguardBlock"));
        assert!(logged.contains("program=/tmp/app.exe"));
    }

    #[tokio::test]
    async fn test_apply_rule_failure_captures_output() {
        let _guard = ENV_VAR_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().expect("tempdir");
        let mock = write_mock_netsh(
            dir.path(),
            "echo 'No rules match the specified criteria.'; exit 1",
        );
        unsafe {
            std::env::set_var("OUTGUARD_NETSH_COMMAND", &mock);
        }

        let result = apply_rule(Path::new("/tmp/app.exe"), Direction::Unblock).await;

        unsafe {
            std::env::remove_var("OUTGUARD_NETSH_COMMAND");
        }

        match result {
            Err(Error::Netsh {
                message, exit_code, ..
            }) => {
                assert!(message.contains("No rules match"));
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("expected Netsh error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_apply_rule_spawn_failure() {
        let _guard = ENV_VAR_MUTEX.lock().unwrap();
        unsafe {
            std::env::set_var(
                "OUTGUARD_NETSH_COMMAND",
                PathBuf::from("/nonexistent/outguard_mock_netsh"),
            );
        }

        let result = apply_rule(Path::new("/tmp/app.exe"), Direction::Block).await;

        unsafe {
            std::env::remove_var("OUTGUARD_NETSH_COMMAND");
        }

        assert!(matches!(result, Err(Error::Internal(_))));
    }
}
