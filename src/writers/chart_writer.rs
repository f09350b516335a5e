use crate::analyzers::TemperatureSummary;
use crate::error::{Result, WeatherError};
use crate::utils::constants::{DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH};
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;
use tracing::info;

/// Renders a [`TemperatureSummary`] as an SVG point chart, one point per statistic.
pub struct ChartWriter {
    width: u32,
    height: u32,
}

impl ChartWriter {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_PLOT_WIDTH,
            height: DEFAULT_PLOT_HEIGHT,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn write_summary(&self, summary: &TemperatureSummary, title: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let entries = summary.entries();
        let (y_min, y_max) = y_bounds(entries.iter().map(|(_, v)| *v));
        let x_max = entries.len() as f64 - 0.5;

        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 32))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)
            .map_err(plot_error)?;

        let label = |x: &f64| stat_label(&entries, *x);
        chart
            .configure_mesh()
            .x_labels(entries.len())
            .x_label_formatter(&label)
            .y_desc("Temperature (°C)")
            .draw()
            .map_err(plot_error)?;

        chart
            .draw_series(
                entries
                    .iter()
                    .enumerate()
                    .map(|(i, (_, value))| Circle::new((i as f64, *value), 6, BLUE.filled())),
            )
            .map_err(plot_error)?;

        root.present().map_err(plot_error)?;
        info!(path = %path.display(), "Wrote summary chart");
        Ok(())
    }
}

impl Default for ChartWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn plot_error(e: impl Display) -> WeatherError {
    WeatherError::Plot(e.to_string())
}

/// Axis label for tick `x`; only whole positions carry a statistic name.
fn stat_label(entries: &[(&'static str, f64)], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    match entries.get(index as usize) {
        Some(("Standard deviation", _)) => "Std Dev".to_string(),
        Some((name, _)) => name.to_string(),
        None => String::new(),
    }
}

fn y_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.1).max(1.0);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary() -> TemperatureSummary {
        TemperatureSummary {
            column: "UT_temp_mean".to_string(),
            count: 3,
            mean: 15.0,
            median: 15.0,
            min: 10.0,
            max: 20.0,
            std_dev: 5.0,
            range: 10.0,
            mode: 10.0,
        }
    }

    #[test]
    fn test_stat_label() {
        let entries = summary().entries();
        assert_eq!(stat_label(&entries, 0.0), "Mean");
        assert_eq!(stat_label(&entries, 4.0), "Std Dev");
        assert_eq!(stat_label(&entries, 0.5), "");
        assert_eq!(stat_label(&entries, 9.0), "");
        assert_eq!(stat_label(&entries, -1.0), "");
    }

    #[test]
    fn test_y_bounds_pad() {
        assert_eq!(y_bounds([10.0, 20.0].into_iter()), (9.0, 21.0));
        assert_eq!(y_bounds([5.0].into_iter()), (4.0, 6.0));
        assert_eq!(y_bounds(std::iter::empty()), (0.0, 1.0));
    }

    #[test]
    fn test_write_summary_svg() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("charts").join("ut.svg");

        ChartWriter::new()
            .with_size(400, 300)
            .write_summary(&summary(), "Weather trends: UT - All-time", &path)?;

        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        Ok(())
    }
}
