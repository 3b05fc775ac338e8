use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

/// Why retrieving one day of history failed. Every variant is fatal for the
/// whole fetch; nothing is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with an explicit error payload.
    #[error("WeatherAPI error: {message}")]
    Remote { message: String },

    /// The API answered successfully but reported no hours for the day.
    #[error("Error fetching data for {date}, please try again")]
    EmptyData { date: NaiveDate },

    #[error("WeatherAPI history response for {date} contained neither forecast nor error")]
    MissingForecast { date: NaiveDate },

    #[error("Failed to send request to WeatherAPI.com (history for {date})")]
    Transport {
        date: NaiveDate,
        #[source]
        source: reqwest::Error,
    },

    #[error("WeatherAPI history request for {date} failed with status {status}: {body}")]
    Status { date: NaiveDate, status: StatusCode, body: String },

    #[error("Failed to parse WeatherAPI history JSON for {date}")]
    Decode {
        date: NaiveDate,
        #[source]
        source: serde_json::Error,
    },
}
