use std::time::Duration;

use crate::utils::drop_handler::{DropHandler, SystemDropHandler};
use crate::utils::file_picker::{FilePickerHandler, SystemFilePickerHandler};
use crate::widgets::{self, UploaderState};

/// How often to repaint while uploads are in flight.
const PENDING_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct UploaderApp {
    state: UploaderState,
    drop_handler: Box<dyn DropHandler>,
    picker_handler: Box<dyn FilePickerHandler>,
}

impl UploaderApp {
    /// Called once before the first frame.
    pub fn new(state: UploaderState) -> Self {
        Self::with_handlers(
            state,
            Box::new(SystemDropHandler),
            Box::new(SystemFilePickerHandler),
        )
    }

    pub fn with_handlers(
        state: UploaderState,
        drop_handler: Box<dyn DropHandler>,
        picker_handler: Box<dyn FilePickerHandler>,
    ) -> Self {
        Self {
            state,
            drop_handler,
            picker_handler,
        }
    }

    pub fn state(&self) -> &UploaderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut UploaderState {
        &mut self.state
    }
}

impl eframe::App for UploaderApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished gates and transfers before rendering.
        self.state.queue.sync();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Upload files");
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                widgets::uploader(
                    ui,
                    &mut self.state,
                    self.drop_handler.as_ref(),
                    self.picker_handler.as_ref(),
                );
            });
        });

        // Results arrive from the runtime, not from input events.
        if self.state.queue.pending() > 0 {
            ctx.request_repaint_after(PENDING_REPAINT_INTERVAL);
        }
    }
}
