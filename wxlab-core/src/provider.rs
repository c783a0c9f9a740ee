use crate::{
    Config, WeatherError,
    model::{CurrentConditions, ForecastSample, WeatherQuery},
    provider::openweather::OpenWeatherClient,
};

use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Anything that can answer current-weather and forecast lookups.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentConditions, WeatherError>;

    /// Forecast samples in the order the provider returned them.
    async fn forecast(&self, query: &WeatherQuery) -> Result<Vec<ForecastSample>, WeatherError>;
}

/// Construct the OpenWeather source described by `config`.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let client = OpenWeatherClient::from_config(config)?;
    Ok(Box::new(client))
}
