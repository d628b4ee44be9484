//! Application model type: `App`.

use std::path::PathBuf;

use crate::picker::PickerEntry;
use crate::timeline::TimelineEvent;

/// The main application model.
pub struct App {
    pub entries: Vec<PickerEntry>,
    pub selected: usize,
    /// Directory the picker lists, if any.
    pub root: Option<PathBuf>,
    pub events: Vec<TimelineEvent>,
    pub metadata_window: bool,
    /// One-line message for the status row (last bind error etc.).
    pub status: Option<String>,
}

impl App {
    /// Create a new `App` over the given picker `entries`.
    pub fn new(entries: Vec<PickerEntry>, events: Vec<TimelineEvent>) -> Self {
        Self {
            entries,
            selected: 0,
            root: None,
            events,
            metadata_window: false,
            status: None,
        }
    }

    pub fn set_root(&mut self, root: PathBuf) {
        self.root = Some(root);
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Return true if the picker has any files.
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn selected_entry(&self) -> Option<&PickerEntry> {
        self.entries.get(self.selected)
    }

    /// Set the cursor, clamped to the list.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.entries.len().saturating_sub(1));
    }

    /// Select the entry whose path equals `path`, if listed.
    pub fn select_path(&mut self, path: &std::path::Path) -> bool {
        match self.entries.iter().position(|e| e.path == path) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    /// Move selection down. Wraps around to the first entry.
    pub fn next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.entries.len();
    }

    /// Move selection up. Wraps around to the last entry.
    pub fn prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.entries.len() - 1
        } else {
            self.selected - 1
        };
    }
}
