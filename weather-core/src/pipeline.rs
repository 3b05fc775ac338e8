use anyhow::Result;
use chrono::NaiveDate;
use std::time::SystemTime;

use crate::{
    ObservationSet,
    cache::{CacheState, CacheStore},
    fetcher::fetch_observation_set,
    provider::HistoryProvider,
};

/// Refresh the cache for `city` if the gate says so, then load it sorted by
/// timestamp.
///
/// A failed fetch returns before the cache is touched; the [`crate::FetchError`]
/// stays reachable through `downcast_ref`.
pub async fn load_observations(
    provider: &dyn HistoryProvider,
    store: &CacheStore,
    city: &str,
    today: NaiveDate,
    now: SystemTime,
) -> Result<ObservationSet> {
    match store.state(city, now)? {
        CacheState::NeedsFetch => {
            tracing::info!(city, path = %store.path_for(city).display(), "cache missing or stale, fetching");
            let set = fetch_observation_set(provider, city, today).await?;
            store.write(city, &set)?;
        }
        CacheState::Valid => {
            tracing::info!(city, path = %store.path_for(city).display(), "using cached data");
        }
    }

    Ok(store.read(city)?.into_sorted())
}
