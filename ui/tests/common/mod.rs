//! Mocked input sources and transports for uploader UI tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use pagecraft_ui::utils::drop_handler::DropHandler;
use pagecraft_ui::utils::file_picker::FilePickerHandler;
use pagecraft_ui::widgets::{UploaderState, uploader};
use pagecraft_uploader::{
    DragEvent, PickerEvent, RawFile, TransferError, TransferFuture, TransferRequest, Transport,
    UploaderConfig,
};
use serde_json::json;

/// Frames to run after an interaction so the UI settles.
pub const UI_PROPAGATION_FRAMES: usize = 3;

/// Drop handler replaying queued events, one per frame.
#[derive(Clone, Default)]
pub struct MockDropHandler {
    events: Rc<RefCell<VecDeque<DragEvent>>>,
}

impl MockDropHandler {
    pub fn push(&self, event: DragEvent) {
        self.events.borrow_mut().push_back(event);
    }
}

impl DropHandler for MockDropHandler {
    fn handle_drop(&self, _ctx: &egui::Context) -> Option<DragEvent> {
        self.events.borrow_mut().pop_front()
    }
}

/// File picker that "selects" a fixed list of files.
#[derive(Clone, Default)]
pub struct MockFilePickerHandler {
    files: Rc<RefCell<Vec<RawFile>>>,
    opened: Rc<RefCell<usize>>,
}

impl MockFilePickerHandler {
    pub fn selecting(files: Vec<RawFile>) -> Self {
        Self {
            files: Rc::new(RefCell::new(files)),
            ..Self::default()
        }
    }

    pub fn opened(&self) -> usize {
        *self.opened.borrow()
    }
}

impl FilePickerHandler for MockFilePickerHandler {
    fn pick_files(&self) -> PickerEvent {
        *self.opened.borrow_mut() += 1;
        let files = self.files.borrow().clone();
        if files.is_empty() {
            PickerEvent::Cancel
        } else {
            PickerEvent::Change(files)
        }
    }
}

/// Widget state plus the mocked input sources it is rendered with.
pub struct TestUploader {
    pub uploader: UploaderState,
    pub drop: MockDropHandler,
    pub picker: MockFilePickerHandler,
}

impl TestUploader {
    pub fn new(config: UploaderConfig, transport: Arc<dyn Transport>, files: Vec<RawFile>) -> Self {
        Self {
            uploader: UploaderState::new(config, transport).expect("runtime is available"),
            drop: MockDropHandler::default(),
            picker: MockFilePickerHandler::selecting(files),
        }
    }

    pub fn show(ui: &mut egui::Ui, state: &mut Self) {
        uploader(ui, &mut state.uploader, &state.drop, &state.picker);
    }
}

/// Transport answering `{"url": "dummy.url"}` after a short delay.
pub fn delayed_ok_transport() -> Arc<dyn Transport> {
    Arc::new(|_request: TransferRequest| -> TransferFuture {
        Box::pin(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(json!({ "url": "dummy.url" }))
        })
    })
}

pub fn failing_transport() -> Arc<dyn Transport> {
    Arc::new(|_request: TransferRequest| -> TransferFuture {
        Box::pin(async { Err(TransferError::request("error")) })
    })
}

pub fn test_png() -> RawFile {
    RawFile::new("test.png", "image/png", b"xyz".to_vec())
}
