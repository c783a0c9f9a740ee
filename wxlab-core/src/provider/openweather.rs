use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    Config, WeatherError,
    model::{CurrentConditions, ForecastSample, Temperature, WeatherQuery},
};

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at another host, e.g. a mock server or a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `wxlab configure` or set OPENWEATHER_API_KEY."
            )
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let client = Self {
            api_key: api_key.to_owned(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        };

        Ok(client.with_base_url(config.base_url.as_str()))
    }

    /// GET `{base_url}/{endpoint}` for `query` and return the body of a 2xx response.
    async fn fetch(&self, endpoint: &str, query: &WeatherQuery) -> Result<String, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let q = query.as_query();

        debug!(%url, q = %q, "sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", q.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, q = %q, endpoint, "OpenWeather request failed");
            return Err(WeatherError::UpstreamStatus {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Temperature,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

// The current-weather payload is read leniently: every gap has a fallback.
#[derive(Debug, Default, Deserialize)]
struct OwCurrentMain {
    temp: Option<Temperature>,
}

#[derive(Debug, Default, Deserialize)]
struct OwCurrentWeather {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    #[serde(default)]
    main: OwCurrentMain,
    #[serde(default)]
    weather: Vec<OwCurrentWeather>,
    #[serde(default)]
    sys: OwSys,
}

impl OwForecastEntry {
    fn into_sample(self, index: usize) -> Result<ForecastSample, WeatherError> {
        let first = self.weather.into_iter().next();
        let weather = first.ok_or(WeatherError::MalformedEntry {
            index,
            field: "weather[0]",
        })?;

        Ok(ForecastSample::new(self.dt_txt, self.main.temp, weather.description))
    }
}

/// Decode a `/forecast` body into samples, failing on the first incomplete entry.
pub fn parse_forecast(body: &str) -> Result<Vec<ForecastSample>, WeatherError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    parsed
        .list
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_sample(index))
        .collect()
}

/// Decode a `/weather` body; `location` stands in for a missing city name.
pub fn parse_current(body: &str, location: &str) -> Result<CurrentConditions, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let description = parsed
        .weather
        .into_iter()
        .next()
        .and_then(|w| w.description)
        .unwrap_or_else(|| "No description".to_string());

    Ok(CurrentConditions {
        city: parsed.name.unwrap_or_else(|| location.to_string()),
        country: parsed.sys.country.unwrap_or_default(),
        description,
        temperature_c: parsed.main.temp,
        observed_at: parsed.dt.and_then(unix_to_utc),
    })
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self, query), fields(query = %query))]
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentConditions, WeatherError> {
        let body = self.fetch("weather", query).await?;
        parse_current(&body, &query.location)
    }

    #[instrument(skip(self, query), fields(query = %query))]
    async fn forecast(&self, query: &WeatherQuery) -> Result<Vec<ForecastSample>, WeatherError> {
        let body = self.fetch("forecast", query).await?;
        let samples = parse_forecast(&body)?;
        debug!(samples = samples.len(), "decoded OpenWeather forecast");
        Ok(samples)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
