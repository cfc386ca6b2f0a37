//! Client for the remote prediction service.
//!
//! The service exposes two endpoints:
//!
//! - `POST /predict`: multipart body with a single `file` field; answers
//!   with a JSON array of `{"class", "confidence"}` objects, most confident
//!   first, or a non-2xx status with an optional `{"error": "..."}` body.
//! - `GET /health`: liveness probe answering `{"status", "message"}`.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::prediction::PredictionResult;
use crate::selection::ImageKind;
use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// The request payload for one classification.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub kind: ImageKind,
    pub bytes: Arc<[u8]>,
}

/// Answer of the health endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Anything that can rank an uploaded image.
///
/// The returned future is `'static` so it can be driven on a background
/// thread independent of the caller.
pub trait PredictionService: Send + Sync {
    fn predict(&self, upload: Upload) -> BoxFuture<'static, Result<Vec<PredictionResult>>>;
}

/// HTTP implementation of [`PredictionService`].
#[derive(Clone)]
pub struct HttpPredictionService {
    client: reqwest::Client,
    predict_url: Url,
    health_url: Url,
}

impl HttpPredictionService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            predict_url: config.endpoint("predict")?,
            health_url: config.endpoint("health")?,
        })
    }

    /// Queries the health endpoint.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.health_url.clone()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(AppError::Service {
                status: status.as_u16(),
                message: service_error_message(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| AppError::MalformedResponse(e.to_string()))
    }
}

impl PredictionService for HttpPredictionService {
    fn predict(&self, upload: Upload) -> BoxFuture<'static, Result<Vec<PredictionResult>>> {
        Box::pin(send_predict(
            self.client.clone(),
            self.predict_url.clone(),
            upload,
        ))
    }
}

async fn send_predict(
    client: reqwest::Client,
    url: Url,
    upload: Upload,
) -> Result<Vec<PredictionResult>> {
    let part = Part::bytes(upload.bytes.to_vec())
        .file_name(upload.file_name.clone())
        .mime_str(upload.kind.mime())
        .map_err(|e| AppError::Transport(format!("Invalid content type: {}", e)))?;
    let form = Form::new().part(FILE_FIELD, part);

    info!(%url, file = %upload.file_name, bytes = upload.bytes.len(), "sending classification request");

    let response = client.post(url).multipart(form).send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    debug!(status, body_len = body.len(), "classification response received");

    interpret_response(status, &body)
}

/// Maps a status/body pair onto the service contract.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<Vec<PredictionResult>> {
    if (200..300).contains(&status) {
        serde_json::from_slice(body).map_err(|e| AppError::MalformedResponse(e.to_string()))
    } else {
        Err(AppError::Service {
            status,
            message: service_error_message(body),
        })
    }
}

/// Extracts a non-empty `error` string from a JSON error body.
fn service_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")
        .and_then(serde_json::Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_is_parsed_verbatim() {
        let body = br#"[{"class":"green_iguana","confidence":0.87},{"class":"chameleon","confidence":0.09}]"#;
        let results = interpret_response(200, body).unwrap();
        assert_eq!(
            results,
            vec![
                PredictionResult::new("green_iguana", 0.87),
                PredictionResult::new("chameleon", 0.09),
            ]
        );
    }

    #[test]
    fn empty_array_is_a_valid_success() {
        assert!(interpret_response(200, b"[]").unwrap().is_empty());
    }

    #[test]
    fn non_array_success_is_malformed() {
        assert!(matches!(
            interpret_response(200, br#"{"class":"Frog"}"#),
            Err(AppError::MalformedResponse(_))
        ));
        assert!(matches!(
            interpret_response(204, b""),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn error_field_is_extracted() {
        match interpret_response(503, br#"{"error":"model unavailable"}"#) {
            Err(AppError::Service { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message.as_deref(), Some("model unavailable"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn error_without_usable_field_has_no_message() {
        let bodies: [&[u8]; 4] = [b"<html>Bad Gateway</html>", br#"{"error":42}"#, br#"{"error":""}"#, b""];
        for body in bodies {
            match interpret_response(502, body) {
                Err(AppError::Service { message, .. }) => assert_eq!(message, None),
                other => panic!("unexpected: {other:?}"),
            }
        }
    }

    #[test]
    fn health_status_ok_is_case_insensitive() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"OK","message":"Server is healthy."}"#).unwrap();
        assert!(health.is_ok());
        let partial: HealthStatus = serde_json::from_str(r#"{"status":"degraded"}"#).unwrap();
        assert!(!partial.is_ok());
        assert!(partial.message.is_empty());
    }
}
