//! Reptile Classifier Core Library
//!
//! This library implements a client for a remote image classification
//! service: pick one image, send it for classification, and show the ranked
//! classes that come back.
//!
//! # Overview
//!
//! - **Selection**: one JPEG/PNG file at a time via [`selection`], with a
//!   preview whose lifetime is tied to the selection ([`preview`])
//! - **Workflow**: an explicit state machine in [`workflow`] driven by the
//!   [`controller`], which also runs requests in the background
//! - **Service**: the HTTP contract of `/predict` and `/health` in [`service`]
//! - **Display**: formatting projections in [`view`] and the desktop window
//!   in [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use reptile_classifier_core::ReptileClassifier;
//!
//! let app = ReptileClassifier::new()?;
//! let mut controller = app.controller();
//!
//! if let Some(image) = app.surface().select_path("iguana.png".as_ref())? {
//!     controller.select(image);
//!     controller.classify();
//! }
//! ```
//!
//! # Module Structure
//!
//! - [`config`]: Configuration loading and management
//! - [`controller`]: Request lifecycle and state ownership
//! - [`error`]: Error types and result aliases
//! - [`image_processing`]: Preview decoding
//! - [`prediction`]: Ranked result types
//! - [`preview`]: Preview handles and registries
//! - [`selection`]: The selection surface
//! - [`service`]: Prediction service client
//! - [`ui`]: Desktop front-end
//! - [`view`]: Presentation projections
//! - [`workflow`]: The state machine

pub mod config;
pub mod controller;
pub mod error;
pub mod image_processing;
pub mod prediction;
pub mod preview;
pub mod selection;
pub mod service;
pub mod ui;
pub mod view;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export primary types for convenience
pub use config::Config;
pub use controller::ClassificationController;
pub use error::{AppError, Result};
pub use prediction::{PredictionResult, Predictions};
pub use selection::{Candidate, ImageKind, SelectedImage, SelectionSurface};
pub use service::{HealthStatus, HttpPredictionService, PredictionService};
pub use view::View;
pub use workflow::WorkflowState;

use preview::DecodedPreviews;
use std::sync::Arc;

/// Main entry point for the classifier application.
///
/// Wires the configuration, the HTTP service, and the preview registry
/// together and hands out controllers and selection surfaces built on them.
pub struct ReptileClassifier {
    config: Config,
    previews: Arc<DecodedPreviews>,
    service: Arc<HttpPredictionService>,
}

impl ReptileClassifier {
    /// Creates an instance configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::load()?)
    }

    /// Creates an instance with custom configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        let service = Arc::new(HttpPredictionService::new(&config)?);
        let previews = Arc::new(DecodedPreviews::new(config.preview_max_edge));
        Ok(Self {
            config,
            previews,
            service,
        })
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A selection surface producing previews in this instance's registry.
    pub fn surface(&self) -> SelectionSurface {
        SelectionSurface::new(self.previews.clone())
    }

    /// A fresh controller talking to the configured service.
    pub fn controller(&self) -> ClassificationController {
        ClassificationController::new(self.service.clone())
    }

    pub fn previews(&self) -> Arc<DecodedPreviews> {
        Arc::clone(&self.previews)
    }

    /// Opens the desktop window and blocks until it is closed.
    pub fn run_interactive(&self) -> Result<()> {
        ui::run_classifier_ui(self.controller(), self.surface(), self.previews())
    }

    /// Probes the service's health endpoint.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.service.health().await
    }
}

/// Loads `.env` files into the process environment.
///
/// Call this once at application startup before reading configuration.
pub fn init() {
    let _ = dotenvy::dotenv();
}
