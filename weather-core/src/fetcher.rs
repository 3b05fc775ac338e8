use chrono::NaiveDate;

use crate::{FetchError, ObservationSet, provider::HistoryProvider};

/// Number of calendar days fetched, ending yesterday.
pub const LOOKBACK_DAYS: i64 = 7;

/// Yesterday first, then back to `today - LOOKBACK_DAYS`.
pub fn lookback_dates(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (1..=LOOKBACK_DAYS).map(move |n| today - chrono::Duration::days(n))
}

/// Fetch every day of the lookback window, one request at a time.
///
/// Stops at the first failing day, so the caller never sees a partial window.
pub async fn fetch_observation_set(
    provider: &dyn HistoryProvider,
    city: &str,
    today: NaiveDate,
) -> Result<ObservationSet, FetchError> {
    let mut observations = Vec::with_capacity(LOOKBACK_DAYS as usize * 24);

    for date in lookback_dates(today) {
        let hours = provider.hourly_history(city, date).await.inspect_err(|err| {
            tracing::warn!(city, %date, error = %err, "aborting history fetch");
        })?;
        tracing::debug!(city, %date, hours = hours.len(), "fetched day");
        observations.extend(hours);
    }

    tracing::info!(city, rows = observations.len(), "fetched {LOOKBACK_DAYS} days of history");

    Ok(ObservationSet::new(observations))
}
