//! Preview references for the selected image.
//!
//! A preview is created when an image is selected and must be released
//! exactly once when that image is replaced, cleared, or torn down.
//! [`PreviewHandle`] ties the release to `Drop` so every exit path is covered.

use crate::image_processing::ImageProcessor;
use image::RgbaImage;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Identifier of a live preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId(u64);

impl PreviewId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview-{}", self.0)
    }
}

/// Creates and releases preview resources.
pub trait PreviewRegistry: Send + Sync {
    /// Creates a preview for the raw image bytes.
    fn create(&self, bytes: &[u8]) -> PreviewId;

    /// Releases a preview. Called once per id by [`PreviewHandle`].
    fn release(&self, id: PreviewId);
}

/// Owning handle for a preview; releases it on drop.
///
/// Deliberately not `Clone`: one handle, one release.
pub struct PreviewHandle {
    id: PreviewId,
    registry: Arc<dyn PreviewRegistry>,
}

impl PreviewHandle {
    pub fn acquire(registry: Arc<dyn PreviewRegistry>, bytes: &[u8]) -> Self {
        let id = registry.create(bytes);
        Self { id, registry }
    }

    pub fn id(&self) -> PreviewId {
        self.id
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}

/// Registry that keeps decoded, downsized RGBA previews in memory.
///
/// The desktop UI reads images from here to build textures. A payload that
/// cannot be decoded still gets an id; it simply has no image.
pub struct DecodedPreviews {
    next_id: AtomicU64,
    max_edge: u32,
    entries: Mutex<HashMap<PreviewId, Option<Arc<RgbaImage>>>>,
}

impl DecodedPreviews {
    pub fn new(max_edge: u32) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            max_edge,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The decoded image for a live preview.
    pub fn get(&self, id: PreviewId) -> Option<Arc<RgbaImage>> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(&id).cloned().flatten())
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}

impl PreviewRegistry for DecodedPreviews {
    fn create(&self, bytes: &[u8]) -> PreviewId {
        let id = PreviewId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let image = match ImageProcessor::thumbnail(bytes, self.max_edge) {
            Ok(image) => Some(Arc::new(image)),
            Err(e) => {
                warn!(%id, error = %e, "preview unavailable");
                None
            }
        };

        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(id, image);
        }
        id
    }

    fn release(&self, id: PreviewId) {
        let removed = self
            .entries
            .lock()
            .map(|mut entries| entries.remove(&id).is_some())
            .unwrap_or(false);
        if !removed {
            warn!(%id, "release of unknown preview");
        }
    }
}
