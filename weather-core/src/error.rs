use thiserror::Error;

/// Failures while fetching weather from the upstream API.
///
/// The `Display` output is what the gateway hands back to clients.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("error retrieving weather data: {0}")]
    Network(#[source] reqwest::Error),

    #[error("expected JSON response, got: {content_type}")]
    ContentType { content_type: String },

    #[error("error reading response data: {0}")]
    Read(#[source] reqwest::Error),

    #[error("error parsing weather data: {0}")]
    Decode(#[from] serde_json::Error),
}
