//! UI rendering helpers.
//!
//! Drawing functions for the drop zone, the error banner, and the result
//! panels. They only read projections; none of them touch workflow state.

use super::selection::drop_prompt;
use super::state::PreviewTexture;
use crate::view::{ResultRow, TopPrediction};
use eframe::egui;

/// Highlight color for the top prediction, progress bars, and drag hover.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(74, 222, 128);

const PANEL_FILL: egui::Color32 = egui::Color32::from_rgb(55, 65, 81);
const ERROR_FILL: egui::Color32 = egui::Color32::from_rgb(127, 29, 29);
const ERROR_STROKE: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(252, 165, 165);

/// Tallest the preview is drawn, in points.
pub const PREVIEW_MAX_HEIGHT: f32 = 320.0;

/// Fits an image of the given aspect ratio inside `max_width` x `max_height`.
pub fn preview_size(aspect: f32, max_width: f32, max_height: f32) -> egui::Vec2 {
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    let mut height = max_height;
    let mut width = height * aspect;
    if width > max_width {
        width = max_width;
        height = width / aspect;
    }
    egui::vec2(width, height)
}

/// Draws the drop zone and returns its click response.
///
/// Shows the preview when one is selected, otherwise the drop prompt.
pub fn drop_zone(
    ui: &mut egui::Ui,
    drag_active: bool,
    preview: Option<&PreviewTexture>,
) -> egui::Response {
    let (stroke, fill) = if drag_active {
        (ACCENT, egui::Color32::from_gray(55))
    } else {
        (egui::Color32::from_gray(90), egui::Color32::TRANSPARENT)
    };

    let frame = egui::Frame::default()
        .fill(fill)
        .stroke(egui::Stroke::new(2.0, stroke))
        .corner_radius(12.0)
        .inner_margin(24.0);

    let inner = frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.vertical_centered(|ui| match preview {
            Some(PreviewTexture {
                texture: Some(texture),
                aspect,
                ..
            }) => {
                let size = preview_size(*aspect, ui.available_width(), PREVIEW_MAX_HEIGHT);
                ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
                    texture.id(),
                    size,
                )));
                ui.label(egui::RichText::new("Click or drop to change image").small());
            }
            Some(_) => {
                ui.label("Preview unavailable");
                ui.label(egui::RichText::new("Click or drop to change image").small());
            }
            None => {
                ui.label(egui::RichText::new(drop_prompt(drag_active)).size(18.0));
                ui.label(egui::RichText::new("Supports: PNG, JPG, JPEG").small());
            }
        });
    });

    inner.response.interact(egui::Sense::click())
}

/// Draws the single error message.
pub fn error_banner(ui: &mut egui::Ui, message: &str) {
    egui::Frame::default()
        .fill(ERROR_FILL)
        .stroke(egui::Stroke::new(1.0, ERROR_STROKE))
        .corner_radius(8.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(message).color(ERROR_TEXT));
            });
        });
}

/// Draws the highlighted top prediction.
pub fn top_prediction(ui: &mut egui::Ui, top: &TopPrediction) {
    egui::Frame::default()
        .fill(PANEL_FILL)
        .corner_radius(12.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("Top Prediction").size(18.0).strong());
                ui.label(
                    egui::RichText::new(&top.label)
                        .size(36.0)
                        .strong()
                        .color(ACCENT),
                );
                ui.label(egui::RichText::new(format!("Confidence: {}", top.confidence)).size(22.0));
            });
        });
}

/// Draws one labelled bar per prediction, in service order.
pub fn probability_rows(ui: &mut egui::Ui, rows: &[ResultRow]) {
    ui.label(egui::RichText::new("All Probabilities").size(18.0).strong());
    ui.add_space(6.0);

    for row in rows {
        egui::Frame::default()
            .fill(PANEL_FILL)
            .corner_radius(6.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let label_width = ui.available_width() / 3.0;
                    ui.add_sized([label_width, 18.0], egui::Label::new(row.label.as_str()));
                    ui.add(
                        egui::ProgressBar::new(row.fraction)
                            .text(row.confidence.as_str())
                            .fill(ACCENT),
                    );
                });
            });
        ui.add_space(4.0);
    }
}
