//! Ordered watched-folder list with change notification
//!
//! Front ends bind list views to this sequence, so every mutation emits a
//! structured [`ListEvent`] (insert-at, remove-at, move, edit, reset) to all
//! subscribers. Insertion order is the user-visible order; no uniqueness is
//! enforced.
//!
//! Reorder operations are deliberately forgiving: moving the first entry up
//! or the last entry down is a no-op rather than an error, matching how list
//! widgets treat their boundary rows.

use tokio::sync::mpsc;

/// Structured change event describing one list mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Inserted { index: usize, path: String },
    Removed { index: usize },
    Moved { from: usize, to: usize },
    Edited { index: usize, path: String },
    Reset,
}

/// The ordered watched-folder sequence.
#[derive(Debug, Default)]
pub struct WatchList {
    paths: Vec<String>,
    subscribers: Vec<mpsc::UnboundedSender<ListEvent>>,
}

impl WatchList {
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            paths,
            subscribers: Vec::new(),
        }
    }

    /// Registers a change-event subscriber. Subscribers whose receiver is
    /// dropped are pruned on the next notification.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ListEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: &ListEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Appends a path, returning its index.
    pub fn insert(&mut self, path: String) -> usize {
        let index = self.paths.len();
        self.paths.push(path.clone());
        self.notify(&ListEvent::Inserted { index, path });
        index
    }

    /// Removes and returns the path at `index`; `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.paths.len() {
            return None;
        }
        let removed = self.paths.remove(index);
        self.notify(&ListEvent::Removed { index });
        Some(removed)
    }

    /// Swaps the entry at `index` with the one above it.
    /// Returns false (no event, no change) for the first entry or an
    /// out-of-range index.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.paths.len() {
            return false;
        }
        self.paths.swap(index, index - 1);
        self.notify(&ListEvent::Moved {
            from: index,
            to: index - 1,
        });
        true
    }

    /// Swaps the entry at `index` with the one below it.
    /// Returns false (no event, no change) for the last entry or an
    /// out-of-range index.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.paths.len() {
            return false;
        }
        self.paths.swap(index, index + 1);
        self.notify(&ListEvent::Moved {
            from: index,
            to: index + 1,
        });
        true
    }

    /// Replaces the path at `index`; false if out of range.
    pub fn edit(&mut self, index: usize, path: String) -> bool {
        if index >= self.paths.len() {
            return false;
        }
        self.paths[index] = path.clone();
        self.notify(&ListEvent::Edited { index, path });
        true
    }

    /// Replaces the whole sequence (used by import).
    pub fn reset(&mut self, paths: Vec<String>) {
        self.paths = paths;
        self.notify(&ListEvent::Reset);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.paths
    }

    /// Clones the current sequence, e.g. for a run to snapshot.
    pub fn snapshot(&self) -> Vec<String> {
        self.paths.clone()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
