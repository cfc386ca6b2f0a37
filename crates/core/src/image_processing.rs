//! Image decoding for previews.
//!
//! The classifier sends the original bytes untouched; decoding only happens
//! to show the user what they picked. Large photos are downsized so the
//! preview texture stays small.

use crate::error::{AppError, Result};
use image::RgbaImage;

/// Image processing utilities for the preview pipeline.
pub struct ImageProcessor;

impl ImageProcessor {
    /// Decodes an image and fits it within a `max_edge` square.
    ///
    /// The format is sniffed from the bytes rather than trusted from the
    /// declared type. Images already small enough are not resampled.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ImageProcessing`] if the bytes cannot be decoded.
    pub fn thumbnail(bytes: &[u8], max_edge: u32) -> Result<RgbaImage> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| AppError::image(format!("Failed to decode image: {}", e)))?;

        let image = if image.width() > max_edge || image.height() > max_edge {
            image.thumbnail(max_edge, max_edge)
        } else {
            image
        };

        Ok(image.to_rgba8())
    }

    /// Width divided by height.
    pub fn aspect_ratio(image: &RgbaImage) -> f32 {
        image.width() as f32 / image.height().max(1) as f32
    }
}
