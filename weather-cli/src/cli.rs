use anyhow::anyhow;
use chrono::Local;
use clap::Parser;
use std::time::SystemTime;
use weather_history_core::{
    CacheStore, Config, TemperatureSummary, WeatherApiProvider, pipeline, plot,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-history",
    version,
    about = "Hourly temperature history for the last 7 days of a city"
)]
pub struct Cli {
    /// City name, passed to the weather API as-is.
    #[arg(short, long)]
    pub city: String,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let provider = WeatherApiProvider::from_config(&config);
        let store = CacheStore::from_config(&config);

        let observations = pipeline::load_observations(
            &provider,
            &store,
            &self.city,
            Local::now().date_naive(),
            SystemTime::now(),
        )
        .await?;
        tracing::info!(city = %self.city, rows = observations.len(), "loaded observations");

        let summary = TemperatureSummary::from_observations(&observations).ok_or_else(|| {
            anyhow!(
                "Cache file {} contains no observations.\n\
                 Hint: delete it and run again to refetch.",
                store.path_for(&self.city).display()
            )
        })?;
        println!("{summary}");

        let plot_path = config.plot_path(&self.city);
        plot::render_temperature_chart(&observations, &self.city, &plot_path)?;
        tracing::info!(city = %self.city, path = %plot_path.display(), "chart ready");
        println!("Temperature chart written to {}", plot_path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn city_is_required() {
        assert!(Cli::try_parse_from(["weather-history"]).is_err());
    }

    #[test]
    fn short_and_long_city_flags() {
        let cli = Cli::try_parse_from(["weather-history", "-c", "New York"]).unwrap();
        assert_eq!(cli.city, "New York");

        let cli = Cli::try_parse_from(["weather-history", "--city", "Oslo"]).unwrap();
        assert_eq!(cli.city, "Oslo");
    }
}
