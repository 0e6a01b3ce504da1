//! Input sources feeding the upload queue.
//!
//! Both sources turn their own events into a plain list of files; the queue
//! runs them through the same intake path via [`crate::UploadQueue::ingest`].
//!
//! - [`PickerAdapter`]: a file selection changed (dialog, command line, ...).
//! - [`DragAdapter`]: drag-and-drop, with a hover flag for the drop target.

use crate::file::RawFile;

/// An input source that turns its events into files for intake.
pub trait IngestAdapter {
    type Event;

    /// Handles one event and returns the files it delivered (often none).
    fn accept(&mut self, event: Self::Event) -> Vec<RawFile>;
}

/// Events from a file selection control.
#[derive(Debug, Clone)]
pub enum PickerEvent {
    Change(Vec<RawFile>),
    /// The dialog was dismissed without a selection.
    Cancel,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PickerAdapter;

impl IngestAdapter for PickerAdapter {
    type Event = PickerEvent;

    fn accept(&mut self, event: PickerEvent) -> Vec<RawFile> {
        match event {
            PickerEvent::Change(files) => {
                log::debug!(
                    target: "pagecraft_uploader::ingest",
                    "picker_change files={}",
                    files.len()
                );
                files
            }
            PickerEvent::Cancel => Vec::new(),
        }
    }
}

/// Events from a drop target.
#[derive(Debug, Clone)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<RawFile>),
}

/// Drag-and-drop source.
///
/// `is_dragover` is purely presentational: set while something hovers the
/// drop target, cleared when it leaves or is dropped. A disabled adapter
/// ignores every event.
#[derive(Debug, Clone, Copy)]
pub struct DragAdapter {
    enabled: bool,
    dragover: bool,
}

impl Default for DragAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DragAdapter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            dragover: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragover(&self) -> bool {
        self.dragover
    }
}

impl IngestAdapter for DragAdapter {
    type Event = DragEvent;

    fn accept(&mut self, event: DragEvent) -> Vec<RawFile> {
        if !self.enabled {
            return Vec::new();
        }

        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.dragover = true;
                Vec::new()
            }
            DragEvent::Leave => {
                self.dragover = false;
                Vec::new()
            }
            DragEvent::Drop(files) => {
                self.dragover = false;
                log::debug!(
                    target: "pagecraft_uploader::ingest",
                    "drop files={}",
                    files.len()
                );
                files
            }
        }
    }
}
