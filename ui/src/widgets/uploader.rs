//! The uploader widget: trigger button or drop area, manual "Upload all",
//! the file list and the last uploaded URL.
//!
//! The widget never waits on the queue. Whoever owns the [`UploaderState`]
//! is expected to call [`UploadQueue::sync`] once per frame (the
//! [`crate::UploaderApp`] does) so finished transfers show up.

use std::sync::Arc;

use egui::{Button, Frame, RichText, Ui, vec2};
use pagecraft_uploader::{
    DragAdapter, DragEvent, PickerAdapter, Transport, UploadError, UploadQueue, UploadStatus,
    UploaderConfig, payload_url,
};

use super::upload_list::upload_list;
use crate::utils::colors::COLOR_AMBER;
use crate::utils::drop_handler::DropHandler;
use crate::utils::file_picker::{FilePickerHandler, open_shortcut_pressed};

/// Height of the drop area in drag mode (pixels).
const DROP_AREA_HEIGHT: f32 = 96.0;

/// Everything the uploader widget keeps between frames.
#[derive(Debug)]
pub struct UploaderState {
    pub queue: UploadQueue,
    pub picker: PickerAdapter,
    pub drag: DragAdapter,
}

impl UploaderState {
    /// Needs a tokio runtime on the current thread (see [`UploadQueue::new`]).
    pub fn new(config: UploaderConfig, transport: Arc<dyn Transport>) -> Result<Self, UploadError> {
        Ok(Self::from_queue(UploadQueue::new(config, transport)?))
    }

    pub fn with_http(config: UploaderConfig) -> Result<Self, UploadError> {
        Ok(Self::from_queue(UploadQueue::with_http(config)?))
    }

    pub fn from_queue(queue: UploadQueue) -> Self {
        let drag = DragAdapter::new(queue.config().settings.drag);
        Self {
            queue,
            picker: PickerAdapter,
            drag,
        }
    }
}

/// Renders the uploader and feeds user input into the queue.
pub fn uploader(
    ui: &mut Ui,
    state: &mut UploaderState,
    drop_handler: &dyn DropHandler,
    picker_handler: &dyn FilePickerHandler,
) {
    let settings = &state.queue.config().settings;
    let drag_enabled = settings.drag;
    let manual = !settings.auto_upload;
    let list_type = settings.list_type;

    if drag_enabled {
        forward_drag(ui.ctx(), state, drop_handler);
    }

    let uploading = state.queue.is_uploading();
    let clicked = if drag_enabled {
        drop_area(ui, state.drag.is_dragover(), uploading)
    } else {
        upload_button(ui, uploading)
    };

    if !uploading && (clicked || open_shortcut_pressed(ui.ctx())) {
        let event = picker_handler.pick_files();
        let summary = state.queue.ingest(&mut state.picker, event);
        log::debug!(
            target: "pagecraft_ui::uploader",
            "picked accepted={} rejected={} deferred={}",
            summary.accepted,
            summary.rejected,
            summary.deferred
        );
    }

    let has_ready = state
        .queue
        .records()
        .iter()
        .any(|r| r.status() == UploadStatus::Ready);
    if manual && has_ready && ui.button("Upload all").clicked() {
        let started = state.queue.trigger_all();
        log::debug!(target: "pagecraft_ui::uploader", "upload_all started={started}");
    }

    ui.add_space(8.0);

    if let Some(id) = upload_list(ui, state.queue.records(), list_type) {
        state.queue.remove(id);
    }

    if let Some(url) = state.queue.last_uploaded().and_then(payload_url) {
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Last uploaded:");
            ui.hyperlink(url);
        });
    }
}

fn forward_drag(ctx: &egui::Context, state: &mut UploaderState, drop_handler: &dyn DropHandler) {
    let event = match drop_handler.handle_drop(ctx) {
        Some(event) => event,
        // Hovering stopped without a drop.
        None if state.drag.is_dragover() => DragEvent::Leave,
        None => return,
    };

    log::trace!(target: "pagecraft_ui::drop", "drag_event={event:?}");
    state.queue.ingest(&mut state.drag, event);
}

fn upload_button(ui: &mut Ui, uploading: bool) -> bool {
    let text = if uploading {
        "Uploading…"
    } else {
        "Click to upload"
    };
    ui.add_enabled(!uploading, Button::new(text)).clicked()
}

fn drop_area(ui: &mut Ui, dragover: bool, uploading: bool) -> bool {
    let mut frame = Frame::group(ui.style());
    if dragover {
        frame = frame.stroke(egui::Stroke::new(2.0, COLOR_AMBER));
    }

    frame
        .show(ui, |ui| {
            let text = if uploading {
                RichText::new("Uploading…")
            } else if dragover {
                RichText::new("Release to upload").strong()
            } else {
                RichText::new("Drop files here, or click to upload")
            };
            let button = Button::new(text)
                .frame(false)
                .min_size(vec2(ui.available_width(), DROP_AREA_HEIGHT));
            ui.add_enabled(!uploading, button).clicked()
        })
        .inner
}
