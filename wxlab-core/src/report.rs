//! The two weather functions handed to an agent as tools.
//!
//! Each returns the JSON payload the agent sees. An upstream non-success
//! status becomes a `message` payload instead of an error; anything else
//! that goes wrong is returned as [`WeatherError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    WeatherError,
    model::{CurrentConditions, WeatherQuery},
    provider::WeatherSource,
    summary::summary_lines,
};

/// Payload of [`get_weather_forecast`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastReport {
    /// `{"forecast": ["<date>: <min>°C - <max>°C, <condition>", ...]}`
    Daily { forecast: Vec<String> },
    /// `{"message": "Could not retrieve weather forecast for <query>."}`
    Unavailable { message: String },
}

impl ForecastReport {
    pub fn unavailable(query: &WeatherQuery) -> Self {
        Self::Unavailable {
            message: format!("Could not retrieve weather forecast for {query}."),
        }
    }

    /// Summary lines, or the diagnostic message as the single line.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Daily { forecast } => forecast.iter().map(String::as_str).collect(),
            Self::Unavailable { message } => vec![message.as_str()],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Payload of [`get_weather`]: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReport {
    pub message: String,

    /// Provider observation time, shown by the CLI but kept out of the payload.
    #[serde(skip)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl CurrentReport {
    pub fn from_conditions(current: &CurrentConditions) -> Self {
        let temp = match &current.temperature_c {
            Some(t) => t.to_string(),
            None => "N/A".to_string(),
        };

        Self {
            message: format!(
                "Weather in {}, {}: {}, Temperature: {}°C",
                current.city, current.country, current.description, temp
            ),
            observed_at: current.observed_at,
        }
    }

    pub fn unavailable(query: &WeatherQuery) -> Self {
        Self {
            message: format!("Could not retrieve weather information for {query}."),
            observed_at: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Daily forecast summary for `query`.
pub async fn get_weather_forecast(
    source: &dyn WeatherSource,
    query: &WeatherQuery,
) -> Result<ForecastReport, WeatherError> {
    match source.forecast(query).await {
        Ok(samples) => Ok(ForecastReport::Daily {
            forecast: summary_lines(&samples),
        }),
        Err(err) if err.is_upstream_failure() => {
            info!(%query, error = %err, "forecast unavailable");
            Ok(ForecastReport::unavailable(query))
        }
        Err(err) => Err(err),
    }
}

/// One-line description of the current weather for `query`.
pub async fn get_weather(
    source: &dyn WeatherSource,
    query: &WeatherQuery,
) -> Result<CurrentReport, WeatherError> {
    match source.current(query).await {
        Ok(current) => Ok(CurrentReport::from_conditions(&current)),
        Err(err) if err.is_upstream_failure() => {
            info!(%query, error = %err, "current weather unavailable");
            Ok(CurrentReport::unavailable(query))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{ForecastSample, Temperature};

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a fixed outcome and counts calls.
    #[derive(Debug, Default)]
    struct FakeSource {
        samples: Option<Vec<ForecastSample>>,
        current: Option<CurrentConditions>,
        malformed: bool,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn failure(&self) -> WeatherError {
            if self.malformed {
                WeatherError::MalformedEntry {
                    index: 0,
                    field: "weather[0]",
                }
            } else {
                WeatherError::UpstreamStatus {
                    status: StatusCode::NOT_FOUND,
                    body: "{}".into(),
                }
            }
        }
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        async fn current(&self, _: &WeatherQuery) -> Result<CurrentConditions, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.current.clone().ok_or_else(|| self.failure())
        }

        async fn forecast(&self, _: &WeatherQuery) -> Result<Vec<ForecastSample>, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.samples.clone().ok_or_else(|| self.failure())
        }
    }

    fn temp(json: &str) -> Temperature {
        serde_json::from_str(json).expect("numeric temperature")
    }

    fn london(temperature_c: Option<Temperature>) -> CurrentConditions {
        CurrentConditions {
            city: "London".into(),
            country: "GB".into(),
            description: "light rain".into(),
            temperature_c,
            observed_at: DateTime::from_timestamp(1_700_000_000, 0),
        }
    }

    #[tokio::test]
    async fn forecast_summarizes_samples() {
        let source = FakeSource {
            samples: Some(vec![
                ForecastSample::new("2025-06-01 09:00:00", temp("18"), "sunny"),
                ForecastSample::new("2025-06-01 12:00:00", temp("22"), "sunny"),
                ForecastSample::new("2025-06-01 15:00:00", temp("20"), "cloudy"),
            ]),
            ..Default::default()
        };
        let query = WeatherQuery::new("Lisbon");

        let report = get_weather_forecast(&source, &query).await.unwrap();

        assert_eq!(report.lines(), vec!["2025-06-01: 18°C - 22°C, sunny"]);
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"forecast":["2025-06-01: 18°C - 22°C, sunny"]}"#
        );
    }

    #[tokio::test]
    async fn forecast_upstream_failure_becomes_message() {
        let source = FakeSource::default();
        let query = WeatherQuery::new("Nowhere").with_country("XX");

        let report = get_weather_forecast(&source, &query).await.unwrap();

        assert_eq!(
            report.lines(),
            vec!["Could not retrieve weather forecast for Nowhere,XX."]
        );
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"message":"Could not retrieve weather forecast for Nowhere,XX."}"#
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forecast_with_no_samples_is_empty_list() {
        let source = FakeSource {
            samples: Some(Vec::new()),
            ..Default::default()
        };
        let query = WeatherQuery::new("Lisbon");

        let report = get_weather_forecast(&source, &query).await.unwrap();

        assert!(report.lines().is_empty());
        assert_eq!(report.to_json().unwrap(), r#"{"forecast":[]}"#);
    }

    #[tokio::test]
    async fn forecast_malformed_entry_propagates() {
        let source = FakeSource {
            malformed: true,
            ..Default::default()
        };
        let query = WeatherQuery::new("Lisbon");

        let err = get_weather_forecast(&source, &query).await.unwrap_err();

        assert!(matches!(err, WeatherError::MalformedEntry { .. }));
    }

    #[tokio::test]
    async fn current_weather_message() {
        let source = FakeSource {
            current: Some(london(Some(temp("11.5")))),
            ..Default::default()
        };
        let query = WeatherQuery::new("London");

        let report = get_weather(&source, &query).await.unwrap();

        assert_eq!(
            report.message,
            "Weather in London, GB: light rain, Temperature: 11.5°C"
        );
    }

    #[test]
    fn current_weather_keeps_float_temperature_text() {
        let report = CurrentReport::from_conditions(&london(Some(temp("10.0"))));

        assert!(report.message.ends_with("Temperature: 10.0°C"));
    }

    #[test]
    fn current_weather_without_temperature_says_na() {
        let report = CurrentReport::from_conditions(&london(None));

        assert_eq!(
            report.message,
            "Weather in London, GB: light rain, Temperature: N/A°C"
        );
    }

    #[test]
    fn observation_time_is_carried_but_not_serialized() {
        let report = CurrentReport::from_conditions(&london(None));
        let observed = report.observed_at.map(|t| t.timestamp());

        assert_eq!(observed, Some(1_700_000_000));
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"message":"Weather in London, GB: light rain, Temperature: N/A°C"}"#
        );
    }

    #[tokio::test]
    async fn current_weather_upstream_failure_becomes_message() {
        let source = FakeSource::default();
        let query = WeatherQuery::new("Nowhere");

        let report = get_weather(&source, &query).await.unwrap();

        assert_eq!(report.observed_at, None);
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"message":"Could not retrieve weather information for Nowhere."}"#
        );
    }

    #[test]
    fn forecast_report_deserializes_either_shape() {
        let daily: ForecastReport = serde_json::from_str(r#"{"forecast":["a"]}"#).unwrap();
        assert_eq!(daily.lines(), vec!["a"]);

        let msg: ForecastReport = serde_json::from_str(r#"{"message":"m"}"#).unwrap();
        assert!(matches!(msg, ForecastReport::Unavailable { .. }));
        assert_eq!(msg.lines(), vec!["m"]);
    }
}
