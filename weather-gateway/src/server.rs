//! HTTP surface: the `/city` route and its handlers.

use anyhow::Context;
use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use weather_core::{CityRequest, WeatherProvider};

use crate::error::GatewayError;

/// Shared per-process state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

impl From<Box<dyn WeatherProvider>> for AppState {
    fn from(provider: Box<dyn WeatherProvider>) -> Self {
        Self::new(Arc::from(provider))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/city",
            get(city_from_query)
                .post(city_from_body)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Serve the gateway on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// GET /city?name=<city>. Only the first `name` value counts; absent means empty.
/// HEAD is routed to `method_not_allowed` instead of falling through to here.
async fn city_from_query(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, GatewayError> {
    let city = params
        .into_iter()
        .find_map(|(key, value)| (key == "name").then_some(value))
        .unwrap_or_default();

    weather_response(&state, &city).await
}

/// POST /city with `{"name": "<city>"}`. The content type of the request is not checked.
async fn city_from_body(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    // Decode the first JSON value only; trailing bytes are ignored.
    let mut de = serde_json::Deserializer::from_slice(&body);
    let request = CityRequest::deserialize(&mut de).map_err(GatewayError::MalformedBody)?;

    weather_response(&state, &request.name).await
}

async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

async fn weather_response(state: &AppState, city: &str) -> Result<Response, GatewayError> {
    let weather = state.provider.fetch_weather(city).await?;
    let mut body = serde_json::to_vec(&weather).map_err(GatewayError::Encode)?;
    body.push(b'\n');

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
