//! Read-only projections of the workflow for display.
//!
//! Nothing here mutates state. The formatting rules are fixed: labels have
//! underscores replaced by spaces, the top prediction shows two decimals and
//! each row shows one.

use crate::prediction::{PredictionResult, Predictions};
use crate::preview::PreviewId;
use crate::workflow::{Phase, WorkflowState};

/// Label of the classify button while idle.
pub const SUBMIT_LABEL: &str = "Classify Reptile";

/// Label of the classify button while a request is in flight.
pub const SUBMITTING_LABEL: &str = "Classifying...";

/// Decimal places for the top prediction's confidence.
pub const TOP_CONFIDENCE_DIGITS: usize = 2;

/// Decimal places for each row in the full list.
pub const ROW_CONFIDENCE_DIGITS: usize = 1;

/// `green_iguana` -> `green iguana`.
pub fn display_label(class: &str) -> String {
    class.replace('_', " ")
}

/// Fixed-point formatting that rounds exact halves away from zero.
///
/// `format!` rounds the exact binary value correctly but breaks ties to
/// even, printing `12.25` as `12.2`; results are expected as `12.3`. Only a
/// value whose exact decimal expansion ends in a `5` at the first dropped
/// digit is a tie; `1.0449999...` must still round down.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if is_exact_tie(value, digits) {
        let scale = 10f64.powi(digits as i32);
        // exact ties are dyadic, so the scaled value is an exact half
        return format!("{:.*}", digits, (value * scale).round() / scale);
    }
    format!("{:.*}", digits, value)
}

/// Longest fractional expansion of an `f64` is 1074 digits.
const EXACT_DIGITS: usize = 1100;

fn is_exact_tie(value: f64, digits: usize) -> bool {
    if !value.is_finite() {
        return false;
    }
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let Some((_, fraction)) = exact.split_once('.') else {
        return false;
    };
    match fraction.as_bytes().get(digits..) {
        Some([b'5', rest @ ..]) => rest.iter().all(|d| *d == b'0'),
        _ => false,
    }
}

/// A confidence in `[0, 1]` as a percentage string, e.g. `87.00%`.
pub fn percent(confidence: f64, digits: usize) -> String {
    format!("{}%", to_fixed(confidence * 100.0, digits))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopPrediction {
    pub label: String,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub label: String,
    pub confidence: String,
    /// Bar fill in `[0, 1]`.
    pub fraction: f32,
}

impl From<&PredictionResult> for ResultRow {
    fn from(result: &PredictionResult) -> Self {
        Self {
            label: display_label(&result.label),
            confidence: percent(result.confidence, ROW_CONFIDENCE_DIGITS),
            fraction: result.confidence.clamp(0.0, 1.0) as f32,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub top: TopPrediction,
    pub rows: Vec<ResultRow>,
}

impl ResultsView {
    pub fn from_predictions(predictions: &Predictions) -> Self {
        let top = predictions.top();
        Self {
            top: TopPrediction {
                label: display_label(&top.label),
                confidence: percent(top.confidence, TOP_CONFIDENCE_DIGITS),
            },
            rows: predictions.iter().map(ResultRow::from).collect(),
        }
    }
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub state: WorkflowState,
    pub file_name: Option<String>,
    pub preview: Option<PreviewId>,
    pub classify_enabled: bool,
    pub show_clear: bool,
    pub submit_label: &'static str,
    pub error: Option<String>,
    pub results: Option<ResultsView>,
}

impl View {
    pub fn from_phase(phase: &Phase) -> Self {
        let state = phase.state();
        let image = phase.image();
        let submitting = state == WorkflowState::Submitting;
        let error = phase.error().map(str::to_owned);
        let results = phase.predictions().map(ResultsView::from_predictions);

        Self {
            state,
            file_name: image.map(|i| i.name().to_owned()),
            preview: image.map(|i| i.preview().id()),
            classify_enabled: image.is_some() && !submitting,
            show_clear: image.is_some() || results.is_some() || error.is_some(),
            submit_label: if submitting { SUBMITTING_LABEL } else { SUBMIT_LABEL },
            error,
            results,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state == WorkflowState::Submitting
    }
}
