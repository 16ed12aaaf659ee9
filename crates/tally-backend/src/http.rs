//! Shared HTTP response helpers for the remote backend.
//!
//! Centralizes the status-code check so request sites stay focused on
//! building requests and mapping response bodies.

use crate::error::BackendError;

/// Check an HTTP response for error status.
///
/// Returns the response unchanged on success; any non-success status maps
/// to [`BackendError::Api`] carrying the response body as the message.
pub(crate) async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    if !resp.status().is_success() {
        return Err(BackendError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
