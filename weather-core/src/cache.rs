//! Per-city CSV cache and the freshness check deciding whether to refetch.

use anyhow::{Context, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use crate::{Config, Observation, ObservationSet};

const HEADER: [&str; 4] = ["timestamp", "temp_c", "wind_kph", "humidity"];

/// Outcome of the freshness check, decided once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    NeedsFetch,
    Valid,
}

/// City name made safe for use as a file name. Percent-encoded, so distinct
/// names never share a file.
pub fn city_file_stem(city: &str) -> String {
    urlencoding::encode(city).into_owned()
}

/// True when more than `max_age` has passed since `modified`. A modification
/// time in the future counts as fresh.
pub fn is_expired(modified: SystemTime, now: SystemTime, max_age: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(elapsed) => elapsed > max_age,
        Err(_) => false,
    }
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    max_age: Duration,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self { dir: dir.into(), max_age }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_dir.clone(), config.max_age())
    }

    pub fn path_for(&self, city: &str) -> PathBuf {
        self.dir.join(format!("{}_weather_data.csv", city_file_stem(city)))
    }

    /// Judged purely by file age, never by the rows inside.
    pub fn state(&self, city: &str, now: SystemTime) -> Result<CacheState> {
        let path = self.path_for(city);

        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(CacheState::NeedsFetch),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to stat cache file: {}", path.display()));
            }
        };

        let modified = meta
            .modified()
            .with_context(|| format!("Failed to read mtime of cache file: {}", path.display()))?;

        if is_expired(modified, now, self.max_age) {
            Ok(CacheState::NeedsFetch)
        } else {
            Ok(CacheState::Valid)
        }
    }

    /// Replace the cache file for `city` wholesale.
    pub fn write(&self, city: &str, set: &ObservationSet) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create cache directory: {}", self.dir.display())
        })?;

        let path = self.path_for(city);
        write_csv(&path, set)?;
        tracing::info!(path = %path.display(), rows = set.len(), "wrote cache file");

        Ok(path)
    }

    pub fn read(&self, city: &str) -> Result<ObservationSet> {
        read_csv(&self.path_for(city))
    }
}

/// Write `set` to `path` with a header row. Goes through a sibling temp file
/// and a rename, so readers never see a half-written cache.
pub fn write_csv(path: &Path, set: &ObservationSet) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");

    let written = write_rows(&tmp, set).and_then(|()| {
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to move cache file into place: {}", path.display()))
    });

    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }

    written
}

fn write_rows(tmp: &Path, set: &ObservationSet) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(tmp)
        .with_context(|| format!("Failed to create cache file: {}", tmp.display()))?;

    writer.write_record(HEADER).context("Failed to write cache header")?;
    for obs in set.iter() {
        writer
            .serialize(obs)
            .with_context(|| format!("Failed to write row for {}", obs.timestamp))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush cache file: {}", tmp.display()))?;

    Ok(())
}

pub fn read_csv(path: &Path) -> Result<ObservationSet> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open cache file: {}", path.display()))?;

    let mut observations = Vec::new();
    for (idx, row) in reader.deserialize::<Observation>().enumerate() {
        // +2: 1-based, after the header
        let obs = row.with_context(|| {
            format!("Malformed row at line {} of {}", idx + 2, path.display())
        })?;
        observations.push(obs);
    }

    Ok(ObservationSet::new(observations))
}
