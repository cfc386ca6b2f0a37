//! The classifier window.
//!
//! This module contains `ClassifierApp`, which implements `eframe::App`.
//! Each frame it applies finished requests, collects file events, draws the
//! current view, and forwards at most one user action to the controller.

use super::rendering::{drop_zone, error_banner, probability_rows, top_prediction};
use super::selection::candidates_from_drop;
use super::state::{DropZoneState, PreviewTexture};
use crate::controller::ClassificationController;
use crate::error::{AppError, Result};
use crate::image_processing::ImageProcessor;
use crate::preview::{DecodedPreviews, PreviewId};
use crate::selection::{ACCEPTED_EXTENSIONS, Candidate, SelectionSurface};
use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const WINDOW_TITLE: &str = "Reptile Classifier AI";

/// How often to check for a finished request while one is in flight.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// User actions collected while drawing, applied after the frame.
enum Action {
    Pick,
    Classify,
    Clear,
}

pub struct ClassifierApp {
    controller: ClassificationController,
    surface: SelectionSurface,
    previews: Arc<DecodedPreviews>,
    preview_texture: Option<PreviewTexture>,
    drop_zone: DropZoneState,
}

impl ClassifierApp {
    pub fn new(
        controller: ClassificationController,
        surface: SelectionSurface,
        previews: Arc<DecodedPreviews>,
    ) -> Self {
        Self {
            controller,
            surface,
            previews,
            preview_texture: None,
            drop_zone: DropZoneState::default(),
        }
    }

    /// Hands candidates to the selection surface; rejected ones are ignored.
    fn offer(&mut self, candidates: Vec<Candidate>) {
        if let Some(image) = self.surface.select_file(candidates) {
            self.controller.select(image);
        }
    }

    fn handle_file_events(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) =
            ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        self.drop_zone.drag_active = hovering;

        if dropped.is_empty() {
            return;
        }
        if let Some(candidates) = candidates_from_drop(&dropped) {
            self.offer(candidates);
        }
    }

    fn pick_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", ACCEPTED_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        match Candidate::from_path(&path) {
            Ok(candidate) => self.offer(vec![candidate]),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to read selected file"),
        }
    }

    /// Uploads the preview texture when the selected preview changes.
    fn sync_preview_texture(&mut self, ctx: &egui::Context, preview: Option<PreviewId>) {
        if self.preview_texture.as_ref().map(|p| p.id) == preview {
            return;
        }

        self.preview_texture = preview.map(|id| {
            let image = self.previews.get(id);
            let texture = image.as_ref().map(|image| {
                let size = [image.width() as usize, image.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
                ctx.load_texture(id.to_string(), color_image, egui::TextureOptions::LINEAR)
            });
            let aspect = image
                .as_deref()
                .map(ImageProcessor::aspect_ratio)
                .unwrap_or(1.0);
            PreviewTexture { id, texture, aspect }
        });
    }
}

impl eframe::App for ClassifierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Enforce dark mode
        ctx.set_visuals(egui::Visuals::dark());

        self.controller.poll();
        self.handle_file_events(ctx);

        let view = self.controller.view();
        self.sync_preview_texture(ctx, view.preview);
        if view.is_submitting() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }

        let mut action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(WINDOW_TITLE)
                            .size(36.0)
                            .strong()
                            .color(super::rendering::ACCENT),
                    );
                    ui.label("Upload an image to identify a reptile.");
                });
                ui.add_space(16.0);

                if drop_zone(ui, self.drop_zone.drag_active, self.preview_texture.as_ref())
                    .clicked()
                {
                    action = Some(Action::Pick);
                }
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    let classify = egui::Button::new(view.submit_label).min_size(egui::vec2(200.0, 36.0));
                    if ui.add_enabled(view.classify_enabled, classify).clicked() {
                        action = Some(Action::Classify);
                    }
                    if view.show_clear && ui.button("Clear").clicked() {
                        action = Some(Action::Clear);
                    }
                });
                ui.add_space(12.0);

                if view.is_submitting() {
                    ui.vertical_centered(|ui| {
                        ui.add(egui::Spinner::new().size(48.0));
                    });
                }

                if let Some(error) = &view.error {
                    error_banner(ui, error);
                    ui.add_space(12.0);
                }

                if let Some(results) = &view.results {
                    top_prediction(ui, &results.top);
                    ui.add_space(16.0);
                    probability_rows(ui, &results.rows);
                }
            });
        });

        if let Some(action) = action {
            match action {
                Action::Pick => self.pick_file(),
                Action::Classify => {
                    self.controller.classify();
                }
                Action::Clear => self.controller.clear(),
            }
            ctx.request_repaint();
        }
    }
}

/// Launches the classifier window and returns when the user closes it.
pub fn run(
    controller: ClassificationController,
    surface: SelectionSurface,
    previews: Arc<DecodedPreviews>,
) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([720.0, 860.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ClassifierApp::new(controller, surface, previews)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {}", e)))
}
