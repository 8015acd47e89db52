//! Privilege checks and self-relaunch for firewall mutation
//!
//! Firewall rules are machine-wide state: on Windows, `netsh advfirewall`
//! refuses to mutate them from a non-elevated process. Instead of failing
//! per rule, OUTGUARD checks once up front and relaunches itself elevated
//! when needed, mirroring how desktop firewall tools behave.
//!
//! # Strategy
//!
//! - **Windows**: probe with `net session` (succeeds only in an elevated
//!   process); if not elevated, relaunch via PowerShell
//!   `Start-Process -Verb RunAs` and let the original instance exit.
//! - **Unix**: treat euid 0 as elevated; anything else is an error telling
//!   the user to rerun under sudo (self-relaunch through a graphical prompt
//!   is a Windows convention).
//!
//! # Environment Variables
//!
//! - `OUTGUARD_TEST_NO_ELEVATION`: treat the process as already elevated.
//!   For testing only - the netsh mock does not need privileges.

use crate::core::error::{Error, Result};

/// Outcome of [`ensure_elevated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationStatus {
    /// This process already holds the required rights; proceed.
    Elevated,
    /// An elevated copy of this process was launched; the caller must exit
    /// without doing any work.
    Relaunched,
}

/// Returns true if this process can mutate firewall state.
pub fn is_elevated() -> bool {
    if std::env::var("OUTGUARD_TEST_NO_ELEVATION").is_ok() {
        return true;
    }
    platform_is_elevated()
}

#[cfg(unix)]
fn platform_is_elevated() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(windows)]
fn platform_is_elevated() -> bool {
    // `net session` exits non-zero unless run elevated
    std::process::Command::new("net")
        .arg("session")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(not(any(unix, windows)))]
fn platform_is_elevated() -> bool {
    false
}

/// Ensures the process holds firewall-mutation rights, relaunching elevated
/// when the platform supports it.
///
/// # Errors
///
/// Returns [`Error::Privilege`] if elevation cannot be obtained; callers
/// must treat that as fatal for the current command.
pub fn ensure_elevated() -> Result<ElevationStatus> {
    if is_elevated() {
        return Ok(ElevationStatus::Elevated);
    }
    relaunch_elevated()
}

#[cfg(windows)]
fn relaunch_elevated() -> Result<ElevationStatus> {
    let exe = std::env::current_exe()
        .map_err(|e| Error::Privilege(format!("cannot locate own executable: {e}")))?;

    let args: Vec<String> = std::env::args()
        .skip(1)
        .map(|arg| powershell_quote(&arg))
        .collect();

    let mut command = format!(
        "Start-Process -Verb RunAs -FilePath {}",
        powershell_quote(&exe.display().to_string()),
    );
    if !args.is_empty() {
        command.push_str(&format!(" -ArgumentList @({})", args.join(", ")));
    }

    let status = std::process::Command::new("powershell")
        .args(["-NoProfile", "-Command", &command])
        .status()
        .map_err(|e| Error::Privilege(format!("cannot launch elevation prompt: {e}")))?;

    if status.success() {
        Ok(ElevationStatus::Relaunched)
    } else {
        Err(Error::Privilege(
            "elevation was declined or failed".to_string(),
        ))
    }
}

#[cfg(not(windows))]
fn relaunch_elevated() -> Result<ElevationStatus> {
    Err(Error::Privilege(
        "firewall mutation requires root; rerun this command under sudo".to_string(),
    ))
}

/// Single-quotes a string for PowerShell, doubling embedded quotes.
#[cfg(windows)]
fn powershell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
