//! Core library for the `weather-history` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com history client behind a provider trait
//! - The per-city CSV cache and its freshness gate
//! - Temperature statistics and charting
//!
//! It is used by `weather-history-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod pipeline;
pub mod plot;
pub mod provider;
pub mod stats;

pub use cache::{CacheState, CacheStore};
pub use config::Config;
pub use error::FetchError;
pub use model::{Observation, ObservationSet};
pub use provider::{HistoryProvider, weatherapi::WeatherApiProvider};
pub use stats::TemperatureSummary;
