//! OUTGUARD - Outbound Guard
//!
//! Blocks outbound network access for programs found under watched folders,
//! driving the Windows advanced-firewall command surface one rule per file.
//!
//! # Architecture
//!
//! - [`core`] - Folder scanning, per-file rule application, and run pipeline
//! - [`watchlist`] - Ordered watched-folder list with change notification
//! - [`control`] - Control surface: list operations, persistence, run management
//! - [`config`] - Watch-list persistence
//! - [`exchange`] - TOML import/export of watch lists
//! - [`elevation`] - Privilege checks and elevated self-relaunch
//! - [`audit`] - Audit logging of firewall-mutating operations
//! - [`validators`] - Input validation
//! - [`utils`] - Utility functions (platform directories)
//!
//! # Safety Features
//!
//! - Firewall failures are captured per file, never silently swallowed
//! - Runs snapshot the watch list; list edits are never observed mid-run
//! - Single-run mutual exclusion between block and unblock
//! - Atomic config writes with sha256 sidecar checksums
//! - Audit trail of all rule-mutating runs

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]

pub mod audit;
pub mod config;
pub mod control;
pub mod core;
pub mod elevation;
pub mod exchange;
pub mod utils;
pub mod validators;
pub mod watchlist;

// Re-export commonly used types
pub use crate::core::error::{Error, Result};
pub use crate::core::firewall::{Direction, RULE_NAME};
pub use crate::core::pipeline::{ProgressEvent, RunSummary};
pub use crate::core::scanner::ExtensionSet;
