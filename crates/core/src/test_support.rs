//! Shared fixtures for unit tests.

use crate::error::{AppError, Result};
use crate::prediction::PredictionResult;
use crate::preview::{PreviewId, PreviewRegistry};
use crate::selection::{Candidate, SelectedImage, SelectionSurface};
use crate::service::{PredictionService, Upload};
use futures::future::BoxFuture;
use image::{ImageFormat, RgbaImage};
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Preview registry that counts creations and releases per id.
#[derive(Default)]
pub struct RecordingPreviews {
    next_id: AtomicU64,
    releases: Mutex<HashMap<PreviewId, usize>>,
}

impl RecordingPreviews {
    pub fn created(&self) -> usize {
        self.releases.lock().unwrap().len()
    }

    pub fn releases(&self, id: PreviewId) -> usize {
        self.releases.lock().unwrap().get(&id).copied().unwrap_or(0)
    }

    pub fn live(&self) -> usize {
        self.releases.lock().unwrap().values().filter(|n| **n == 0).count()
    }

    pub fn all_released_once(&self) -> bool {
        self.releases.lock().unwrap().values().all(|n| *n == 1)
    }
}

impl PreviewRegistry for RecordingPreviews {
    fn create(&self, _bytes: &[u8]) -> PreviewId {
        let id = PreviewId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.releases.lock().unwrap().insert(id, 0);
        id
    }

    fn release(&self, id: PreviewId) {
        *self.releases.lock().unwrap().entry(id).or_insert(0) += 1;
    }
}

/// Selects a PNG-typed image named `name` through a real selection surface.
pub fn select(previews: &Arc<RecordingPreviews>, name: &str) -> SelectedImage {
    let surface = SelectionSurface::new(previews.clone());
    surface
        .select_file(vec![Candidate::new(name, None, png_bytes(2, 2))])
        .expect("fixture image accepted")
}

pub fn iguana_results() -> Vec<PredictionResult> {
    vec![
        PredictionResult::new("green_iguana", 0.87),
        PredictionResult::new("chameleon", 0.09),
    ]
}

/// Encodes a blank RGBA image as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::new(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

type Outcome = Result<Vec<PredictionResult>>;

/// Prediction service whose answers are released by the test.
///
/// Each call to `predict` consumes the oldest scripted gate; dropping the
/// sender side yields a transport error.
#[derive(Default)]
pub struct GatedService {
    gates: Mutex<VecDeque<oneshot::Receiver<Outcome>>>,
    calls: AtomicUsize,
}

impl GatedService {
    pub fn script(&self) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PredictionService for GatedService {
    fn predict(&self, _upload: Upload) -> BoxFuture<'static, Outcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        Box::pin(async move {
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(AppError::Transport("connection reset".into()))),
                None => Err(AppError::Transport("no response scripted".into())),
            }
        })
    }
}
