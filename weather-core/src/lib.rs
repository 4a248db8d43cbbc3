//! Core library for the `weather-gateway` service.
//!
//! This crate defines:
//! - Gateway configuration handling
//! - Abstraction over the upstream weather provider
//! - Shared domain models (city requests, weather info)
//!
//! It is used by `weather-gateway`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::GatewayConfig;
pub use error::UpstreamError;
pub use model::{CityRequest, WeatherInfo};
pub use provider::{WeatherProvider, goweather::GoWeatherProvider, provider_from_config};
