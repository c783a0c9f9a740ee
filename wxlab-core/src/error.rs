use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to a weather source or decoding its payload.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Failed to reach weather service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Weather service responded with status {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// The body was not the JSON shape we expect.
    #[error("Failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A forecast entry parsed as JSON but lacks a field the summarizer needs.
    #[error("Forecast entry #{index} is missing {field}")]
    MalformedEntry { index: usize, field: &'static str },
}

impl WeatherError {
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, WeatherError::UpstreamStatus { .. })
    }
}
