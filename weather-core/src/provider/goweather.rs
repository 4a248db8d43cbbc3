use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

use crate::{UpstreamError, WeatherInfo};

use super::WeatherProvider;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Provider backed by the public GoWeather API (`<base>/weather/<city>`).
#[derive(Debug, Clone)]
pub struct GoWeatherProvider {
    base_url: String,
    http: Client,
}

impl GoWeatherProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    pub fn builder(base_url: impl Into<String>) -> GoWeatherProviderBuilder {
        GoWeatherProviderBuilder { base_url: base_url.into(), timeout: None }
    }

    /// Upstream URL for `city`: the base URL with the raw name appended, unescaped.
    pub fn request_url(&self, city: &str) -> String {
        format!("{}{}", self.base_url, city)
    }
}

#[derive(Debug)]
pub struct GoWeatherProviderBuilder {
    base_url: String,
    timeout: Option<Duration>,
}

impl GoWeatherProviderBuilder {
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<GoWeatherProvider, reqwest::Error> {
        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(GoWeatherProvider { base_url: self.base_url, http: http.build()? })
    }
}

#[async_trait]
impl WeatherProvider for GoWeatherProvider {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherInfo, UpstreamError> {
        let url = self.request_url(city);
        debug!(%url, "requesting weather from upstream");

        let res = self.http.get(&url).send().await.map_err(UpstreamError::Network)?;

        // Exact match only; parameters such as `; charset=utf-8` are rejected.
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();
        if content_type != JSON_CONTENT_TYPE {
            return Err(UpstreamError::ContentType { content_type });
        }

        let body = res.bytes().await.map_err(UpstreamError::Read)?;
        let weather: WeatherInfo = serde_json::from_slice(&body)?;

        Ok(weather)
    }
}
