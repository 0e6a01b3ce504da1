//! Shared color constants for the UI.

use egui::Color32;
use pagecraft_uploader::UploadStatus;

/// Forest green color for uploaded files.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red color for failed uploads.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Amber color for uploads in flight.
pub const COLOR_AMBER: Color32 = Color32::from_rgb(255, 193, 7);

/// Gray color for files waiting to be uploaded.
pub const COLOR_GRAY: Color32 = Color32::from_rgb(140, 140, 140);

/// Indicator color for a record's status.
pub fn status_color(status: UploadStatus) -> Color32 {
    match status {
        UploadStatus::Ready => COLOR_GRAY,
        UploadStatus::Loading => COLOR_AMBER,
        UploadStatus::Success => COLOR_GREEN,
        UploadStatus::Error => COLOR_RED,
    }
}
