//! Core library for the `wxlab` CLI.
//!
//! This crate defines:
//! - The daily forecast summarizer
//! - The `get_weather` / `get_weather_forecast` functions and their JSON payloads
//! - An OpenWeather client behind the `WeatherSource` trait
//! - Configuration & credentials handling
//!
//! It is used by `wxlab-cli`, but the report functions can be wired into any tool-calling host.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;
pub mod summary;

pub use config::Config;
pub use error::WeatherError;
pub use model::{CurrentConditions, DailySummary, ForecastSample, Temperature, WeatherQuery};
pub use provider::{WeatherSource, openweather::OpenWeatherClient, source_from_config};
pub use report::{CurrentReport, ForecastReport, get_weather, get_weather_forecast};
pub use summary::{representative_condition, summarize, summary_lines};
