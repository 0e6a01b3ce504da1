//! File picker handler for selecting files via native file dialogs.
//!
//! The picker opens when the upload button is clicked or on the
//! Ctrl+O / Cmd+O shortcut. Selected files are read into memory and handed
//! to the queue as a [`PickerEvent::Change`].

use std::path::PathBuf;

use pagecraft_uploader::{PickerEvent, RawFile};

/// Trait for file picker operations, enabling mock implementations for testing.
pub trait FilePickerHandler {
    /// Opens the picker and reports what the user chose.
    fn pick_files(&self) -> PickerEvent;
}

/// Default file picker handler using the system file dialog.
#[derive(Default)]
pub struct SystemFilePickerHandler;

impl FilePickerHandler for SystemFilePickerHandler {
    fn pick_files(&self) -> PickerEvent {
        let Some(paths) = rfd::FileDialog::new()
            .set_title("Select files to upload")
            .pick_files()
        else {
            log::debug!(target: "pagecraft_ui::picker", "picker_cancelled");
            return PickerEvent::Cancel;
        };

        log::info!(
            target: "pagecraft_ui::picker",
            "picker_selected files={}",
            paths.len()
        );
        PickerEvent::Change(load_files(paths))
    }
}

/// True when the open-file shortcut was pressed this frame.
pub fn open_shortcut_pressed(ctx: &egui::Context) -> bool {
    ctx.input(|i| i.key_pressed(egui::Key::O) && i.modifiers.command_only())
}

/// Reads every selected path, skipping the ones that cannot be read.
pub fn load_files(paths: impl IntoIterator<Item = PathBuf>) -> Vec<RawFile> {
    paths
        .into_iter()
        .filter_map(|path| match RawFile::from_path(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                log::warn!(
                    target: "pagecraft_ui::picker",
                    "selected_file_unreadable path={} error={e}",
                    path.display()
                );
                None
            }
        })
        .collect()
}
