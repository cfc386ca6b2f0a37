//! The classification workflow as an explicit state machine.
//!
//! ```text
//!          select            classify            response ok
//! Idle ───────────▶ Ready ────────────▶ Submitting ───────────▶ Succeeded
//!   ▲                 ▲ │                  │                        │
//!   │                 └─┘ reselect         │ error / transport      │
//!   │                                      ▼                        │
//!   └──────────── clear (from any) ──── Failed ◀────────────────────┘
//! ```
//!
//! [`Workflow::transition`] is pure: it consumes the current workflow and an
//! [`Event`] and returns the next workflow plus at most one [`Command`] for
//! the caller to execute. Each submission is tagged with a [`RequestToken`];
//! a completion whose token is not the one currently in flight is dropped.

use crate::error::{AppError, Result};
use crate::prediction::{PredictionResult, Predictions};
use crate::selection::SelectedImage;
use crate::service::Upload;
use std::fmt;

/// Tag identifying one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which state the workflow is in, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Ready,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Ready => "ready",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A state together with the data it owns.
#[derive(Debug, Default)]
pub enum Phase {
    /// Nothing selected.
    #[default]
    Idle,
    /// An image is selected; no results, no error.
    Ready { image: SelectedImage },
    /// A request for `image` is in flight.
    Submitting {
        image: SelectedImage,
        token: RequestToken,
    },
    /// The service ranked `image`.
    Succeeded {
        image: SelectedImage,
        predictions: Predictions,
    },
    /// The last attempt failed. The image is kept so it can be retried;
    /// it is `None` when classification was requested without one.
    Failed {
        image: Option<SelectedImage>,
        message: String,
    },
}

impl Phase {
    pub fn state(&self) -> WorkflowState {
        match self {
            Self::Idle => WorkflowState::Idle,
            Self::Ready { .. } => WorkflowState::Ready,
            Self::Submitting { .. } => WorkflowState::Submitting,
            Self::Succeeded { .. } => WorkflowState::Succeeded,
            Self::Failed { .. } => WorkflowState::Failed,
        }
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        match self {
            Self::Idle => None,
            Self::Ready { image }
            | Self::Submitting { image, .. }
            | Self::Succeeded { image, .. } => Some(image),
            Self::Failed { image, .. } => image.as_ref(),
        }
    }

    pub fn predictions(&self) -> Option<&Predictions> {
        match self {
            Self::Succeeded { predictions, .. } => Some(predictions),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        match self {
            Self::Submitting { token, .. } => Some(*token),
            _ => None,
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug)]
pub enum Event {
    /// The selection surface accepted a new image.
    Selected(SelectedImage),
    /// The user asked for classification.
    ClassifyRequested,
    /// A request finished, successfully or not.
    Completed {
        token: RequestToken,
        outcome: Result<Vec<PredictionResult>>,
    },
    /// The user cleared everything.
    Cleared,
}

/// Side effects requested by a transition.
#[derive(Debug)]
pub enum Command {
    /// Send `upload` to the prediction service, reporting back with `token`.
    Submit { token: RequestToken, upload: Upload },
}

/// The workflow state plus the generation counter used for request tokens.
#[derive(Debug, Default)]
pub struct Workflow {
    phase: Phase,
    generation: u64,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> WorkflowState {
        self.phase.state()
    }

    /// Whether a completion with `token` would be applied.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.phase.in_flight() == Some(token)
    }

    /// Computes the next workflow for `event`.
    ///
    /// Selecting or clearing advances the generation, so any request still
    /// in flight becomes stale and its completion is ignored.
    pub fn transition(self, event: Event) -> (Self, Option<Command>) {
        let Workflow { phase, generation } = self;

        match event {
            Event::Selected(image) => (
                Workflow {
                    phase: Phase::Ready { image },
                    generation: generation + 1,
                },
                None,
            ),

            Event::Cleared => (
                Workflow {
                    phase: Phase::Idle,
                    generation: generation + 1,
                },
                None,
            ),

            Event::ClassifyRequested => match phase {
                in_flight @ Phase::Submitting { .. } => (
                    Workflow {
                        phase: in_flight,
                        generation,
                    },
                    None,
                ),
                Phase::Idle | Phase::Failed { image: None, .. } => (
                    Workflow {
                        phase: Phase::Failed {
                            image: None,
                            message: AppError::ImageRequired.user_message(),
                        },
                        generation,
                    },
                    None,
                ),
                Phase::Ready { image }
                | Phase::Succeeded { image, .. }
                | Phase::Failed {
                    image: Some(image), ..
                } => {
                    let generation = generation + 1;
                    let token = RequestToken(generation);
                    let upload = image.upload();
                    (
                        Workflow {
                            phase: Phase::Submitting { image, token },
                            generation,
                        },
                        Some(Command::Submit { token, upload }),
                    )
                }
            },

            Event::Completed { token, outcome } => match phase {
                Phase::Submitting {
                    image,
                    token: current,
                } if current == token => {
                    let phase = match outcome {
                        Ok(results) => match Predictions::new(results) {
                            Some(predictions) => Phase::Succeeded { image, predictions },
                            // degenerate success: nothing to show, image kept
                            None => Phase::Ready { image },
                        },
                        Err(err) => Phase::Failed {
                            image: Some(image),
                            message: err.user_message(),
                        },
                    };
                    (Workflow { phase, generation }, None)
                }
                // stale: superseded by a selection or clear
                other => (
                    Workflow {
                        phase: other,
                        generation,
                    },
                    None,
                ),
            },
        }
    }
}
