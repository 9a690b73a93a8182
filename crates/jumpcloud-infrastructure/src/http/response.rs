//! Response decoding shared by every endpoint

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::error;

use jumpcloud_core::error::DomainError;

/// Envelope of the v1 list endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(rename = "totalCount", default)]
    pub total_count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

pub(crate) fn transport(context: &str, err: reqwest::Error) -> DomainError {
    error!("HTTP error {}: {}", context, err);
    DomainError::TransportError(err.to_string())
}

/// Fail on any non-2xx status, keeping the body for the message.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, DomainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(status_error(status, response).await)
}

pub(crate) async fn status_error(status: StatusCode, response: Response) -> DomainError {
    let body = response.text().await.unwrap_or_default();
    DomainError::ApiError { status: status.as_u16(), body }
}

/// Check the status, then decode the JSON body.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DomainError> {
    let response = ensure_success(response).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport("reading response body", e))?;
    serde_json::from_slice(&bytes).map_err(|e| DomainError::DecodeError(e.to_string()))
}
