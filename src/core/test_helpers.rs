//! Shared test utilities for core module tests
//!
//! Provides common test helpers to avoid duplication across test suites.
//! This module is only compiled in test mode.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Mutex for tests that need exclusive access to environment variables.
///
/// Any test that sets `OUTGUARD_NETSH_COMMAND`, `OUTGUARD_DATA_DIR`,
/// `OUTGUARD_STATE_DIR`, or `OUTGUARD_TEST_NO_ELEVATION` must hold this
/// guard for its whole body: the environment is process-global and unit
/// tests run on parallel threads.
///
/// # Example
///
/// ```ignore
/// let _guard = ENV_VAR_MUTEX.lock().unwrap();
/// unsafe {
///     std::env::set_var("OUTGUARD_NETSH_COMMAND", &mock);
/// }
/// // ... test with custom env state ...
/// unsafe {
///     std::env::remove_var("OUTGUARD_NETSH_COMMAND");
/// }
/// ```
pub static ENV_VAR_MUTEX: Mutex<()> = Mutex::new(());

/// Writes a mock netsh script with the given body into `dir` and makes it
/// executable. Returns the script path for `OUTGUARD_NETSH_COMMAND`.
///
/// The body sees the original netsh argument vector as `"$@"` / `"$*"`.
pub fn write_mock_netsh(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("mock_netsh.sh");
    let script = format!("#!/bin/sh\n{body}\n");
    std::fs::write(&path, script).expect("write mock netsh script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod mock netsh script");
    }

    path
}

/// Writes a mock netsh that appends each invocation's arguments to `log`
/// (one line per call) and always succeeds.
pub fn write_logging_mock_netsh(dir: &Path, log: &Path) -> PathBuf {
    write_mock_netsh(
        dir,
        &format!("printf '%s\\n' \"$*\" >> '{}'", log.display()),
    )
}

/// Points the data and state directories at per-test locations.
/// Callers must hold [`ENV_VAR_MUTEX`] and call [`clear_isolated_dirs`]
/// before releasing it.
pub fn isolate_dirs(data: &Path, state: &Path) {
    unsafe {
        std::env::set_var("OUTGUARD_DATA_DIR", data);
        std::env::set_var("OUTGUARD_STATE_DIR", state);
    }
}

/// Clears the per-test directory overrides set by [`isolate_dirs`].
pub fn clear_isolated_dirs() {
    unsafe {
        std::env::remove_var("OUTGUARD_DATA_DIR");
        std::env::remove_var("OUTGUARD_STATE_DIR");
    }
}
