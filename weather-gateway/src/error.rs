use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};
use weather_core::UpstreamError;

/// Everything a `/city` request can fail with, rendered as a plain-text body.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Error parsing request body")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Invalid request method")]
    MethodNotAllowed,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Error generating response")]
    Encode(#[source] serde_json::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Upstream(_) | GatewayError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            GatewayError::MalformedBody(e) => debug!(error = %e, "rejected request body"),
            GatewayError::MethodNotAllowed => debug!("rejected request method"),
            GatewayError::Upstream(e) => warn!(error = %e, "upstream lookup failed"),
            GatewayError::Encode(e) => error!(error = %e, "failed to encode weather response"),
        }

        (self.status(), format!("{self}\n")).into_response()
    }
}
