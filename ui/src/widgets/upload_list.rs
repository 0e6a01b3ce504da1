//! File list rendering for the uploader, in text or picture mode.

use egui::{Image, RichText, Ui, vec2};
use pagecraft_uploader::{FileRecord, ListType, RecordId, UploadStatus};

use crate::utils::colors::{COLOR_RED, status_color};

/// Size of image thumbnails in picture mode (pixels).
const THUMBNAIL_SIZE: f32 = 48.0;

/// Radius of the status indicator circle (in pixels)
const STATUS_DOT_RADIUS: f32 = 4.0;

/// Renders one row per record. Returns the record whose remove button was clicked.
pub fn upload_list(ui: &mut Ui, records: &[FileRecord], list_type: ListType) -> Option<RecordId> {
    let mut removed = None;

    for record in records {
        let clicked = ui
            .push_id(record.id(), |ui| record_row(ui, record, list_type))
            .inner;
        if clicked {
            removed = Some(record.id());
        }
    }

    removed
}

fn record_row(ui: &mut Ui, record: &FileRecord, list_type: ListType) -> bool {
    let mut remove_clicked = false;

    ui.horizontal(|ui| {
        status_dot(ui, record.status());

        if list_type == ListType::Picture {
            thumbnail(ui, record);
        }

        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(record.name());
                ui.label(RichText::new(format_size(record.size())).weak());
                ui.label(RichText::new(record.status().to_string()).small());
                if record.status() == UploadStatus::Loading {
                    ui.spinner();
                }
            });

            match record.status() {
                UploadStatus::Success => {
                    if let Some(url) = record.uploaded_url() {
                        ui.hyperlink(url);
                    }
                }
                UploadStatus::Error => {
                    let detail = record.error().unwrap_or("Upload failed");
                    ui.label(RichText::new(detail).color(COLOR_RED).small());
                }
                UploadStatus::Ready | UploadStatus::Loading => {}
            }
        });

        remove_clicked = ui
            .small_button("Remove")
            .on_hover_text(format!("Remove {}", record.name()))
            .clicked();
    });

    remove_clicked
}

fn thumbnail(ui: &mut Ui, record: &FileRecord) {
    let size = vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
    match record.preview() {
        Some(preview) => {
            ui.add(
                Image::from_bytes(preview.uri.clone(), preview.bytes.clone())
                    .fit_to_exact_size(size)
                    .alt_text(record.name()),
            );
        }
        None => {
            ui.allocate_exact_size(size, egui::Sense::hover());
        }
    }
}

/// Renders a single status dot using a drawn circle
fn status_dot(ui: &mut Ui, status: UploadStatus) {
    let (rect, _response) = ui.allocate_exact_size(
        vec2(STATUS_DOT_RADIUS * 2.0, STATUS_DOT_RADIUS * 2.0),
        egui::Sense::hover(),
    );
    ui.painter().circle(
        rect.center(),
        STATUS_DOT_RADIUS,
        status_color(status),
        egui::Stroke::NONE,
    );
}

fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let size = bytes as f64;
    if size >= MIB {
        format!("{:.1} MiB", size / MIB)
    } else if size >= KIB {
        format!("{:.1} KiB", size / KIB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(3), "3 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }
}
