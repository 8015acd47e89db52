//! Control surface connecting a front end to the core pipeline
//!
//! The [`Controller`] owns the in-memory watch list and is the only thing
//! that mutates it. Every successful mutation is persisted synchronously, so
//! the on-disk list never lags the one on screen; a persistence failure is
//! returned to the caller instead of being dropped.
//!
//! Runs execute on a background task. Starting one snapshots the list (edits
//! during a run are not observed mid-run) and takes the single-run slot;
//! attempting a second concurrent run fails with
//! [`Error::RunInProgress`]. The slot is freed once the run's terminal
//! event has been produced.

use crate::config::{self, WatchConfig};
use crate::core::error::{Error, Result};
use crate::core::firewall::Direction;
use crate::core::pipeline::{self, ProgressEvent, RunRequest};
use crate::core::scanner::ExtensionSet;
use crate::validators::validate_watched_path;
use crate::watchlist::{ListEvent, WatchList};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

pub struct Controller {
    watch_list: WatchList,
    run_active: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl Controller {
    /// Loads the persisted watch list and builds a controller around it.
    pub async fn load() -> Self {
        let config = config::load_config().await;
        Self::from_paths(config.paths)
    }

    /// Builds a controller over an explicit path list without touching disk.
    pub fn from_paths(paths: Vec<String>) -> Self {
        Self {
            watch_list: WatchList::new(paths),
            run_active: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Registers a list-change subscriber (see [`WatchList::subscribe`]).
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ListEvent> {
        self.watch_list.subscribe()
    }

    pub fn list_paths(&self) -> &[String] {
        self.watch_list.as_slice()
    }

    /// Validates and appends a watched folder, returning its index.
    ///
    /// # Errors
    ///
    /// Returns `Err` on invalid input or persistence failure.
    pub async fn add_path(&mut self, path: &str) -> Result<usize> {
        let path = validate_watched_path(path)?;
        let index = self.watch_list.insert(path);
        self.persist().await?;
        Ok(index)
    }

    /// Removes the folder at `index`, returning the removed path.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range index.
    pub async fn remove_path(&mut self, index: usize) -> Result<String> {
        let removed = self.watch_list.remove(index).ok_or_else(|| Error::Validation {
            field: "index".to_string(),
            message: format!("no watched folder at index {index}"),
        })?;
        self.persist().await?;
        Ok(removed)
    }

    /// Moves the folder at `index` up one position. A boundary index is a
    /// no-op and does not rewrite the config.
    pub async fn move_path_up(&mut self, index: usize) -> Result<bool> {
        let moved = self.watch_list.move_up(index);
        if moved {
            self.persist().await?;
        }
        Ok(moved)
    }

    /// Moves the folder at `index` down one position. A boundary index is a
    /// no-op and does not rewrite the config.
    pub async fn move_path_down(&mut self, index: usize) -> Result<bool> {
        let moved = self.watch_list.move_down(index);
        if moved {
            self.persist().await?;
        }
        Ok(moved)
    }

    /// Replaces the folder at `index`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range index or invalid path.
    pub async fn edit_path(&mut self, index: usize, path: &str) -> Result<()> {
        let path = validate_watched_path(path)?;
        if !self.watch_list.edit(index, path) {
            return Err(Error::Validation {
                field: "index".to_string(),
                message: format!("no watched folder at index {index}"),
            });
        }
        self.persist().await
    }

    /// Replaces the watch list wholesale from a TOML document.
    ///
    /// The document is fully parsed before anything changes, so a malformed
    /// import leaves the current list untouched.
    pub async fn import(&mut self, file: &Path) -> Result<usize> {
        let paths = match crate::exchange::import_paths(file).await {
            Ok(paths) => paths,
            Err(e) => {
                crate::audit::log_import(0, false, Some(e.to_string())).await;
                return Err(e);
            }
        };

        let count = paths.len();
        self.watch_list.reset(paths);
        self.persist().await?;
        crate::audit::log_import(count, true, None).await;
        Ok(count)
    }

    /// Writes the current watch list to a TOML document.
    pub async fn export(&self, file: &Path) -> Result<()> {
        let result = crate::exchange::export_paths(file, self.watch_list.as_slice()).await;
        crate::audit::log_export(
            self.watch_list.len(),
            result.is_ok(),
            result.as_ref().err().map(ToString::to_string),
        )
        .await;
        result
    }

    /// Starts a block run over the current list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunInProgress`] while another run is active.
    pub fn run_block(&mut self, extensions: ExtensionSet) -> Result<mpsc::UnboundedReceiver<ProgressEvent>> {
        self.start_run(extensions, Direction::Block)
    }

    /// Starts an unblock run over the current list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunInProgress`] while another run is active.
    pub fn run_unblock(&mut self, extensions: ExtensionSet) -> Result<mpsc::UnboundedReceiver<ProgressEvent>> {
        self.start_run(extensions, Direction::Unblock)
    }

    fn start_run(
        &mut self,
        extensions: ExtensionSet,
        direction: Direction,
    ) -> Result<mpsc::UnboundedReceiver<ProgressEvent>> {
        if self
            .run_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::RunInProgress);
        }

        self.cancel.store(false, Ordering::Release);

        let request = RunRequest {
            roots: self.watch_list.snapshot(),
            extensions,
            direction,
            cancel: self.cancel.clone(),
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let active = self.run_active.clone();
        tokio::spawn(async move {
            pipeline::run(request, tx).await;
            active.store(false, Ordering::Release);
        });

        Ok(rx)
    }

    /// Asks the active run (if any) to stop after the current file.
    pub fn cancel_run(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn run_in_progress(&self) -> bool {
        self.run_active.load(Ordering::Acquire)
    }

    async fn persist(&self) -> Result<()> {
        config::save_config(&WatchConfig {
            paths: self.watch_list.snapshot(),
        })
        .await
    }
}
