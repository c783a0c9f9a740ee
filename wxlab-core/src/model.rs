use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A location lookup, optionally narrowed to a country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub location: String,
    pub country: Option<String>,
}

impl WeatherQuery {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            country: None,
        }
    }

    /// Empty or whitespace-only country codes are ignored.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        let country = country.into();
        self.country = if country.trim().is_empty() {
            None
        } else {
            Some(country)
        };
        self
    }

    /// The `q` parameter sent upstream: `"<location>"` or `"<location>,<country>"`.
    pub fn as_query(&self) -> String {
        match &self.country {
            Some(country) => format!("{},{}", self.location, country),
            None => self.location.clone(),
        }
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query())
    }
}

/// Degrees Celsius, kept as the number the provider sent.
///
/// Rendering follows the payload: `18` prints as `18`, `18.0` as `18.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(Number);

impl Temperature {
    /// `None` for NaN and infinities, which JSON cannot carry.
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(Self)
    }

    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }
}

impl From<i64> for Temperature {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One 3-hour forecast step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// `"YYYY-MM-DD HH:MM:SS"` as sent by the provider.
    pub timestamp: String,
    pub temperature: Temperature,
    pub condition: String,
}

impl ForecastSample {
    pub fn new(
        timestamp: impl Into<String>,
        temperature: Temperature,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            temperature,
            condition: condition.into(),
        }
    }

    /// Text before the first space of the timestamp.
    pub fn date(&self) -> &str {
        let ts = self.timestamp.as_str();
        ts.split_once(' ').map_or(ts, |(date, _)| date)
    }
}

/// Min/max temperature and representative condition for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub min_temp: Temperature,
    pub max_temp: Temperature,
    pub condition: String,
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}°C - {}°C, {}",
            self.date, self.min_temp, self.max_temp, self.condition
        )
    }
}

/// Current conditions as reported by the provider, with its gaps left open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub description: String,
    pub temperature_c: Option<Temperature>,
    pub observed_at: Option<DateTime<Utc>>,
}
