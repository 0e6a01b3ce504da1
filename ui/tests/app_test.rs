//! The eframe app drains finished uploads on its own, frame by frame.

mod common;

use std::time::Duration;

use egui_kittest::Harness;
use kittest::Queryable;
use pagecraft_ui::UploaderApp;
use pagecraft_ui::widgets::UploaderState;
use pagecraft_uploader::{UploadStatus, UploaderConfig};

use crate::common::{MockDropHandler, MockFilePickerHandler, delayed_ok_transport, test_png};

#[tokio::test]
async fn test_app_applies_results_without_settle() {
    let state = UploaderState::new(UploaderConfig::new("test.url"), delayed_ok_transport())
        .expect("runtime is available");
    let app = UploaderApp::with_handlers(
        state,
        Box::new(MockDropHandler::default()),
        Box::new(MockFilePickerHandler::selecting(vec![test_png()])),
    );
    let mut harness = Harness::new_eframe(|_| app);
    harness.step();

    assert!(harness.query_by_label_contains("Upload files").is_some());

    harness.get_by_label("Click to upload").click();
    harness.step();
    harness.step();

    let mut success = false;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        harness.step();

        if harness.state().state().queue.records()[0].status() == UploadStatus::Success {
            success = true;
            break;
        }
    }

    assert!(success, "Upload should finish within timeout");
    harness.step();
    assert!(harness.query_by_label("success").is_some());
}
