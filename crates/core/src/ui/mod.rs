//! Desktop front-end for the classifier.
//!
//! Hosts the selection surface (drag-and-drop and a file picker) and draws
//! whatever the controller's [`View`](crate::view::View) says. The UI never
//! changes workflow state itself; it forwards user actions to the
//! [`ClassificationController`].
//!
//! # Architecture
//!
//! - [`state`]: Per-frame drop-zone state and the uploaded preview texture
//! - [`selection`]: Conversion of host file events into candidates
//! - [`rendering`]: Drawing helpers for the drop zone and results
//! - [`app`]: The `eframe::App` implementation

mod app;
mod rendering;
mod selection;
mod state;

pub use app::ClassifierApp;
pub use state::{DropZoneState, PreviewTexture};

use crate::controller::ClassificationController;
use crate::error::Result;
use crate::preview::DecodedPreviews;
use crate::selection::SelectionSurface;
use std::sync::Arc;

/// Opens the classifier window and blocks until it is closed.
///
/// # Errors
/// Returns [`AppError::Ui`](crate::error::AppError::Ui) if the window
/// cannot be created.
pub fn run_classifier_ui(
    controller: ClassificationController,
    surface: SelectionSurface,
    previews: Arc<DecodedPreviews>,
) -> Result<()> {
    app::run(controller, surface, previews)
}
