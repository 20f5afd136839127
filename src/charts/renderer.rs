//! Static Chart Renderer
//! Draws the per-state trend charts with plotters.
//!
//! Layout, per chart:
//! 1. Title: "COVID-19 {Cases|Deaths} in {state}" centered
//! 2. Raw daily delta: thin red line with a translucent fill down to zero
//! 3. Trailing average: bold black line
//! 4. X-axis: 0-based day index labeled "Days Since First Case"

use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

// Matches the red/black palette of the source charts
const DELTA_COLOR: RGBColor = RGBColor(220, 50, 47);
const AVERAGE_COLOR: RGBColor = RGBColor(0, 0, 0);
const FILL_ALPHA: f64 = 0.15;

const CHART_SIZE: (u32, u32) = (1600, 600);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Drawing error: {0}")]
    DrawError(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ChartError::DrawError(e.to_string())
    }
}

/// Which derived series pair a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesKind {
    Cases,
    Deaths,
}

impl SeriesKind {
    fn daily_column(self) -> &'static str {
        match self {
            SeriesKind::Cases => "daily_cases",
            SeriesKind::Deaths => "daily_deaths",
        }
    }

    fn average_column(self) -> &'static str {
        match self {
            SeriesKind::Cases => "average_cases",
            SeriesKind::Deaths => "average_deaths",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            SeriesKind::Cases => "Cases",
            SeriesKind::Deaths => "Deaths",
        }
    }
}

/// Renders the overlaid delta/average charts as SVG files.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Render the daily/average cases chart for a derived state frame.
    pub fn render_cases_chart(
        df: &DataFrame,
        state: &str,
        path: &Path,
    ) -> Result<(), ChartError> {
        Self::render(df, state, SeriesKind::Cases, path)
    }

    /// Render the daily/average deaths chart for a derived state frame.
    pub fn render_deaths_chart(
        df: &DataFrame,
        state: &str,
        path: &Path,
    ) -> Result<(), ChartError> {
        Self::render(df, state, SeriesKind::Deaths, path)
    }

    /// Pull a derived f64 column as (day index, value) points.
    fn series_points(df: &DataFrame, name: &str) -> Result<Vec<(f64, f64)>, ChartError> {
        let ca = df.column(name)?.f64()?;
        Ok(ca
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as f64, v.unwrap_or(0.0)))
            .collect())
    }

    /// Axis bounds covering both series, padded, always non-degenerate.
    fn axis_ranges(
        daily: &[(f64, f64)],
        average: &[(f64, f64)],
    ) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
        let n = daily.len();
        let x_max = if n > 1 { (n - 1) as f64 } else { 1.0 };

        let mut y_min = 0.0f64;
        let mut y_max = f64::NEG_INFINITY;
        for &(_, y) in daily.iter().chain(average.iter()) {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if !y_max.is_finite() || y_max <= y_min {
            y_max = y_min + 1.0;
        }
        let pad = (y_max - y_min) * 0.05;
        (0.0..x_max, (y_min - pad)..(y_max + pad))
    }

    fn render(
        df: &DataFrame,
        state: &str,
        kind: SeriesKind,
        path: &Path,
    ) -> Result<(), ChartError> {
        let daily = Self::series_points(df, kind.daily_column())?;
        let average = Self::series_points(df, kind.average_column())?;
        let (x_range, y_range) = Self::axis_ranges(&daily, &average);

        let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("COVID-19 {} in {}", kind.noun(), state),
                ("sans-serif", 32),
            )
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("Days Since First Case")
            .y_desc(format!("Number of {}", kind.noun()))
            .draw()?;

        chart.draw_series(AreaSeries::new(
            daily.iter().copied(),
            0.0,
            DELTA_COLOR.mix(FILL_ALPHA),
        ))?;

        chart
            .draw_series(LineSeries::new(
                daily.iter().copied(),
                DELTA_COLOR.stroke_width(2),
            ))?
            .label(format!("{} per Day", kind.noun()))
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], DELTA_COLOR.stroke_width(2))
            });

        chart
            .draw_series(LineSeries::new(
                average.iter().copied(),
                AVERAGE_COLOR.stroke_width(4),
            ))?
            .label("Trailing Average")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], AVERAGE_COLOR.stroke_width(4))
            });

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        info!(state, chart = kind.noun(), path = %path.display(), "chart written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::transform::state_series;
    use crate::data::loader::parse_csv;

    const SAMPLE: &str = "\
date,state,fips,cases,deaths
2020-03-01,Testia,99,10,0
2020-03-02,Testia,99,15,1
2020-03-03,Testia,99,15,1
2020-03-04,Testia,99,25,2
";

    fn derived() -> DataFrame {
        let df = parse_csv(SAMPLE).unwrap();
        state_series(&df, "Testia", 2).unwrap()
    }

    #[test]
    fn series_points_are_indexed_from_zero() {
        let df = derived();
        let points = ChartRenderer::series_points(&df, "daily_cases").unwrap();
        assert_eq!(points, vec![(0.0, 0.0), (1.0, 5.0), (2.0, 0.0), (3.0, 10.0)]);
    }

    #[test]
    fn axis_ranges_cover_both_series() {
        let daily = vec![(0.0, 0.0), (1.0, 5.0)];
        let average = vec![(0.0, 0.0), (1.0, 8.0)];
        let (x, y) = ChartRenderer::axis_ranges(&daily, &average);
        assert_eq!(x, 0.0..1.0);
        assert!(y.start <= 0.0);
        assert!(y.end >= 8.0);
    }

    #[test]
    fn axis_ranges_degenerate_input_stays_valid() {
        let (x, y) = ChartRenderer::axis_ranges(&[], &[]);
        assert!(x.start < x.end);
        assert!(y.start < y.end);
    }

    #[test]
    fn renders_both_charts_to_svg() {
        let dir = tempfile::tempdir().unwrap();
        let df = derived();

        let cases = dir.path().join("cases.svg");
        ChartRenderer::render_cases_chart(&df, "Testia", &cases).unwrap();
        let deaths = dir.path().join("deaths.svg");
        ChartRenderer::render_deaths_chart(&df, "Testia", &deaths).unwrap();

        let svg = std::fs::read_to_string(&cases).unwrap();
        assert!(svg.contains("COVID-19 Cases in Testia"));
        assert!(svg.contains("Days Since First Case"));
        let svg = std::fs::read_to_string(&deaths).unwrap();
        assert!(svg.contains("COVID-19 Deaths in Testia"));
    }

    #[test]
    fn empty_frame_renders_without_panic() {
        let dir = tempfile::tempdir().unwrap();
        let df = parse_csv(SAMPLE).unwrap();
        let empty = state_series(&df, "Nowhere", 7).unwrap();
        let path = dir.path().join("empty.svg");
        ChartRenderer::render_cases_chart(&empty, "Nowhere", &path).unwrap();
        assert!(path.exists());
    }
}
