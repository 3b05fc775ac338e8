use crate::{FetchError, Observation};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

pub mod weatherapi;

/// A source of hourly historical observations.
#[async_trait]
pub trait HistoryProvider: Send + Sync + Debug {
    /// All hourly observations reported for `city` on `date`.
    ///
    /// An empty day is an error ([`FetchError::EmptyData`]), never `Ok(vec![])`.
    async fn hourly_history(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<Vec<Observation>, FetchError>;
}
