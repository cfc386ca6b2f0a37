//! UI-only state.
//!
//! Nothing here is part of the workflow; it is rebuilt from host input and
//! the controller's view every frame.

use crate::preview::PreviewId;
use eframe::egui;

/// Drop-zone interaction state for the current frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct DropZoneState {
    /// Files are being dragged over the window.
    pub drag_active: bool,
}

/// The texture uploaded for the selected image's preview.
///
/// Replaced whenever the selected preview id changes, so the GPU texture is
/// freed together with the selection it belongs to.
pub struct PreviewTexture {
    pub id: PreviewId,
    /// `None` when the payload could not be decoded.
    pub texture: Option<egui::TextureHandle>,
    /// Width divided by height.
    pub aspect: f32,
}
