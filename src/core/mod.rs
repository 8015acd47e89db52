//! Core scan-and-apply functionality
//!
//! This module contains the pieces a front end composes into a run:
//!
//! - [`scanner`]: Recursive folder walking and extension filtering
//! - [`firewall`]: Per-program outbound-block rule application via netsh
//! - [`pipeline`]: Two-phase runs with per-file progress events
//! - [`error`]: Error types for scan, apply, and persistence operations

pub mod error;
pub mod firewall;
pub mod pipeline;
pub mod scanner;

#[cfg(test)]
pub mod test_helpers;
