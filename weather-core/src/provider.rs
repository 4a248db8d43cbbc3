use crate::{GatewayConfig, UpstreamError, WeatherInfo, provider::goweather::GoWeatherProvider};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod goweather;

/// Source of weather data for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherInfo, UpstreamError>;
}

/// Construct the upstream provider described by `config`.
pub fn provider_from_config(config: &GatewayConfig) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = GoWeatherProvider::builder(&config.upstream_base_url)
        .timeout(config.upstream_timeout())
        .build()
        .context("Failed to build HTTP client for the weather upstream")?;

    Ok(Box::new(provider))
}
