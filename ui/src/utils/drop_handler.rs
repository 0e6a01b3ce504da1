//! Drop handler abstractions for drag-and-drop file support.
//!
//! The handler only translates egui's per-frame input into
//! [`DragEvent`]s; the [`pagecraft_uploader::DragAdapter`] owned by the
//! uploader state keeps the hover flag and the queue does the rest.
//!
//! On Windows, drag-and-drop must be explicitly enabled in viewport options
//! (`with_drag_and_drop(true)`).

use pagecraft_uploader::{DragEvent, RawFile};

/// Trait for handling drag-and-drop input, enabling mock implementations for testing.
pub trait DropHandler {
    /// Reports this frame's drag activity, if any.
    ///
    /// `Over` while files hover the window, `Drop` once they are released.
    /// `None` means nothing is being dragged this frame.
    fn handle_drop(&self, ctx: &egui::Context) -> Option<DragEvent>;
}

/// Default drop handler using system drag-and-drop events.
#[derive(Default)]
pub struct SystemDropHandler;

impl DropHandler for SystemDropHandler {
    fn handle_drop(&self, ctx: &egui::Context) -> Option<DragEvent> {
        handle_dropped_files(ctx)
    }
}

/// Reads hovered and dropped files from the current frame's input.
pub fn handle_dropped_files(ctx: &egui::Context) -> Option<DragEvent> {
    let (hovering, dropped_files) =
        ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));

    if dropped_files.is_empty() {
        return hovering.then_some(DragEvent::Over);
    }

    log::trace!(
        target: "pagecraft_ui::drop",
        "dropped_files={}",
        dropped_files.len()
    );

    let files: Vec<RawFile> = dropped_files.iter().filter_map(load_dropped_file).collect();

    if files.len() < dropped_files.len() {
        log::warn!(
            target: "pagecraft_ui::drop",
            "some_dropped_files_skipped dropped={} loaded={}",
            dropped_files.len(),
            files.len()
        );
    }

    Some(DragEvent::Drop(files))
}

/// Loads a dropped file from its bytes (web, some backends) or its path (native).
fn load_dropped_file(file: &egui::DroppedFile) -> Option<RawFile> {
    if let Some(bytes) = &file.bytes {
        let raw = if file.mime.is_empty() {
            RawFile::guessed(file.name.clone(), bytes.clone())
        } else {
            RawFile::new(file.name.clone(), file.mime.clone(), bytes.clone())
        };
        return Some(raw);
    }

    if let Some(path) = &file.path {
        return match RawFile::from_path(path) {
            Ok(raw) => Some(raw),
            Err(e) => {
                log::warn!(
                    target: "pagecraft_ui::drop",
                    "dropped_file_unreadable path={} error={e}",
                    path.display()
                );
                None
            }
        };
    }

    // The backend reported a drop without a filesystem path or contents.
    log::warn!(
        target: "pagecraft_ui::drop",
        "dropped_file_missing_path_and_bytes name={}",
        file.name
    );
    None
}
