use anyhow::{Result, anyhow, bail};
use chrono::NaiveDateTime;
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::{fs, ops::Range, path::Path};

use crate::{ObservationSet, fetcher::LOOKBACK_DAYS};

pub const PLOT_SIZE: (u32, u32) = (1280, 720);

pub fn chart_title(city: &str) -> String {
    format!("Temperature in {city} over last {LOOKBACK_DAYS} days (in Celsius)")
}

/// `(timestamp, temp_c)` points, oldest first.
pub fn temperature_series(set: &ObservationSet) -> Vec<(NaiveDateTime, f64)> {
    let mut points: Vec<_> = set.iter().map(|o| (o.timestamp, o.temp_c)).collect();
    points.sort_by_key(|(ts, _)| *ts);
    points
}

/// Axis ranges covering `points`, padded so a flat or single-point series
/// still has a non-empty range.
fn axis_ranges(points: &[(NaiveDateTime, f64)]) -> Option<(Range<NaiveDateTime>, Range<f64>)> {
    let (first, last) = (points.first()?.0, points.last()?.0);
    let end = if last > first { last } else { first + chrono::Duration::hours(1) };

    let (min_temp, max_temp) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, t)| (lo.min(*t), hi.max(*t)));
    let pad = if (max_temp - min_temp).abs() > 1e-6 { (max_temp - min_temp) * 0.1 } else { 1.0 };

    Some((first..end, (min_temp - pad)..(max_temp + pad)))
}

/// Draw temperature against time as a PNG at `path`.
pub fn render_temperature_chart(set: &ObservationSet, city: &str, path: &Path) -> Result<()> {
    let points = temperature_series(set);
    let Some((x_range, y_range)) = axis_ranges(&points) else {
        bail!("No observations to plot for {city}");
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create plot directory {}: {e}", parent.display()))?;
    }

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(city), ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(RangedDateTime::from(x_range), y_range)
        .map_err(|e| draw_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Temperature")
        .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%Y-%m-%d %Hh").to_string())
        .light_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(|e| draw_err(path, e))?;

    chart.draw_series(LineSeries::new(points, BLUE)).map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))?;
    tracing::info!(path = %path.display(), "wrote temperature chart");

    Ok(())
}

fn draw_err(path: &Path, e: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("Failed to draw chart {}: {e}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Observation;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn set(points: &[(NaiveDateTime, f64)]) -> ObservationSet {
        points
            .iter()
            .map(|&(timestamp, temp_c)| Observation { timestamp, temp_c, wind_kph: 0.0, humidity: 50 })
            .collect()
    }

    #[test]
    fn title_names_city_and_window() {
        assert_eq!(chart_title("Oslo"), "Temperature in Oslo over last 7 days (in Celsius)");
    }

    #[test]
    fn series_is_chronological_with_one_point_per_observation() {
        let s = set(&[(at(5, 3), 2.0), (at(4, 0), 1.0), (at(5, 1), 3.0)]);

        let points = temperature_series(&s);

        assert_eq!(points, vec![(at(4, 0), 1.0), (at(5, 1), 3.0), (at(5, 3), 2.0)]);
    }

    #[test]
    fn ranges_cover_data_with_padding() {
        let points = vec![(at(4, 0), 0.0), (at(5, 0), 10.0)];

        let (x, y) = axis_ranges(&points).unwrap();

        assert_eq!(x, at(4, 0)..at(5, 0));
        assert!((y.start - -1.0).abs() < 1e-9);
        assert!((y.end - 11.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_gets_non_empty_ranges() {
        let (x, y) = axis_ranges(&[(at(4, 0), 5.0)]).unwrap();

        assert_eq!(x, at(4, 0)..at(4, 1));
        assert_eq!(y, 4.0..6.0);
    }

    #[test]
    fn renders_multi_day_chart_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("chart.png");
        let points: Vec<_> = (0..48).map(|h| (at(4 + h / 24, h % 24), (h as f64).sin() * 5.0)).collect();

        render_temperature_chart(&set(&points), "Oslo", &path).unwrap();

        let meta = fs::metadata(&path).unwrap();
        assert!(meta.is_file());
        assert!(meta.len() > 0);
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn empty_set_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        let err = render_temperature_chart(&ObservationSet::default(), "Oslo", &path).unwrap_err();

        assert!(err.to_string().contains("No observations"));
        assert!(!path.exists());
    }
}
