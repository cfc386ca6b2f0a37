//! Ranked results returned by the prediction service.

use serde::{Deserialize, Serialize};

/// One ranked class from the service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Class label, underscore-delimited (e.g. `green_iguana`).
    #[serde(rename = "class")]
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A non-empty result sequence in service order.
///
/// The service ranks by descending confidence; the order is kept verbatim
/// and never re-sorted here.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions(Vec<PredictionResult>);

impl Predictions {
    /// Wraps a result list, or returns `None` when it is empty.
    pub fn new(results: Vec<PredictionResult>) -> Option<Self> {
        if results.is_empty() {
            None
        } else {
            Some(Self(results))
        }
    }

    /// The first entry, shown as the top prediction.
    pub fn top(&self) -> &PredictionResult {
        // non-empty by construction
        &self.0[0]
    }

    pub fn as_slice(&self) -> &[PredictionResult] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PredictionResult> {
        self.0.iter()
    }
}
