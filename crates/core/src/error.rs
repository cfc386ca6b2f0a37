//! Error types for the reptile-classifier-core library.
//!
//! Every failure that can happen while selecting or classifying an image is
//! represented here. The controller never lets these escape: they are folded
//! into the single user-facing message returned by [`AppError::user_message`].

use thiserror::Error;

/// Message shown whenever no more specific message is available.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred.";

/// Message shown when classification is requested before an image is chosen.
pub const IMAGE_REQUIRED_MESSAGE: &str = "Please upload an image first.";

/// Errors that can occur within the reptile-classifier-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (invalid URL, bad timeout, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classification was requested with no image selected.
    ///
    /// Resolved entirely client-side; the service is never contacted.
    #[error("No image selected")]
    ImageRequired,

    /// The service could not be reached (refused, reset, DNS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Service returned status {status}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the response body, when present.
        message: Option<String>,
    },

    /// The service answered 2xx but the body was not a ranked result list.
    #[error("Malformed service response: {0}")]
    MalformedResponse(String),

    /// A file could not be turned into a selection candidate.
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// Image decoding for the preview failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// UI-related errors (window creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }

    /// The message a user sees for this error.
    ///
    /// Service-provided messages are surfaced verbatim; transport and
    /// decoding problems collapse into [`FALLBACK_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::ImageRequired => IMAGE_REQUIRED_MESSAGE.to_string(),
            Self::Service {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
