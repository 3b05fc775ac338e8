use std::fmt;

use crate::ObservationSet;

/// Descriptive statistics over temperature readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (N-1); `None` below two readings.
    pub std_dev: Option<f64>,
}

impl TemperatureSummary {
    /// `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let std_dev = (count > 1).then(|| {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (count - 1) as f64).sqrt()
        });

        Some(Self { count, mean, min, max, std_dev })
    }

    pub fn from_observations(set: &ObservationSet) -> Option<Self> {
        Self::from_values(&set.temperatures())
    }
}

impl fmt::Display for TemperatureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average Temperature (in Celsius): {:.3}", self.mean)?;
        writeln!(f, "Minimal Temperature (in Celsius): {:.3}", self.min)?;
        writeln!(f, "Maximal Temperature (in Celsius): {:.3}", self.max)?;
        write!(f, "St Dev of Average Temperature: {:.3}", self.std_dev.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_values() {
        let s = TemperatureSummary::from_values(&[10.0, 20.0, 30.0]).unwrap();

        assert_eq!(s.count, 3);
        assert_eq!(s.mean, 20.0);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 30.0);
        assert_eq!(s.std_dev, Some(10.0));

        let report = s.to_string();
        assert!(report.contains("Average Temperature (in Celsius): 20.000"));
        assert!(report.contains("Minimal Temperature (in Celsius): 10.000"));
        assert!(report.contains("Maximal Temperature (in Celsius): 30.000"));
        assert!(report.contains("St Dev of Average Temperature: 10.000"));
    }

    #[test]
    fn single_value_has_undefined_std_dev() {
        let s = TemperatureSummary::from_values(&[-4.25]).unwrap();

        assert_eq!((s.mean, s.min, s.max), (-4.25, -4.25, -4.25));
        assert_eq!(s.std_dev, None);
        assert!(s.to_string().ends_with("St Dev of Average Temperature: NaN"));
    }

    #[test]
    fn empty_has_no_summary() {
        assert_eq!(TemperatureSummary::from_values(&[]), None);
    }

    #[test]
    fn order_does_not_matter() {
        let a = TemperatureSummary::from_values(&[3.5, -1.0, 8.25, 0.0]).unwrap();
        let b = TemperatureSummary::from_values(&[8.25, 0.0, 3.5, -1.0]).unwrap();

        assert_eq!((a.min, a.max), (-1.0, 8.25));
        assert!((a.mean - b.mean).abs() < 1e-12);
        assert!((a.std_dev.unwrap() - b.std_dev.unwrap()).abs() < 1e-12);
    }
}
