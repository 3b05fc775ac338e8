use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;

use crate::{Config, FetchError, Observation, model::timestamp_format};

use super::HistoryProvider;

/// WeatherAPI.com `history.json` client.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self { api_key, base_url: base_url.into(), http: Client::new() }
    }

    /// Build from config. A missing key is sent as blank and left for the API
    /// to reject, since a fresh cache needs no request at all.
    pub fn from_config(config: &Config) -> Self {
        let api_key = match config.api_key() {
            Some(key) => key.to_owned(),
            None => {
                tracing::warn!(
                    "No WeatherAPI key configured; set {} or `api_key` in {}",
                    crate::config::API_KEY_ENV,
                    Config::config_file_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "config.toml".to_string()),
                );
                String::new()
            }
        };

        Self::new(api_key, config.base_url.clone())
    }

    fn history_url(&self) -> String {
        format!("{}/history.json", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct WaError {
    code: Option<u32>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaHistoryHour {
    #[serde(with = "timestamp_format")]
    time: NaiveDateTime,
    temp_c: f64,
    wind_kph: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WaHistoryDay {
    #[serde(default)]
    hour: Vec<WaHistoryHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    #[serde(default)]
    forecastday: Vec<WaHistoryDay>,
}

/// Either branch may be present; `error` wins when both are.
#[derive(Debug, Deserialize)]
struct WaHistoryPayload {
    error: Option<WaError>,
    forecast: Option<WaForecast>,
}

impl WaHistoryPayload {
    fn into_observations(self, date: NaiveDate) -> Result<Vec<Observation>, FetchError> {
        if let Some(err) = self.error {
            tracing::debug!(%date, code = ?err.code, "WeatherAPI returned an error payload");
            return Err(FetchError::Remote { message: err.message });
        }

        let forecast = self.forecast.ok_or(FetchError::MissingForecast { date })?;

        let day = forecast
            .forecastday
            .into_iter()
            .next()
            .filter(|day| !day.hour.is_empty())
            .ok_or(FetchError::EmptyData { date })?;

        Ok(day.hour.into_iter().map(Observation::from).collect())
    }
}

impl From<WaHistoryHour> for Observation {
    fn from(h: WaHistoryHour) -> Self {
        Observation { timestamp: h.time, temp_c: h.temp_c, wind_kph: h.wind_kph, humidity: h.humidity }
    }
}

#[async_trait]
impl HistoryProvider for WeatherApiProvider {
    async fn hourly_history(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<Vec<Observation>, FetchError> {
        let dt = date.format("%Y-%m-%d").to_string();

        tracing::debug!(city, %date, "requesting WeatherAPI history");

        let res = self
            .http
            .get(self.history_url())
            .query(&[("key", self.api_key.as_str()), ("q", city), ("dt", dt.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Transport { date, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Transport { date, source })?;

        // Error payloads arrive with 4xx codes, so decode before looking at the status.
        let parsed: WaHistoryPayload = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(FetchError::Status { date, status, body: truncate_body(&body) });
            }
            Err(source) => return Err(FetchError::Decode { date, source }),
        };

        parsed.into_observations(date)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
