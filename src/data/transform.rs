//! State Series Transform Module
//! Derives daily deltas and trailing averages from the cumulative state feed.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

/// Default trailing-average window, in reporting days.
pub const DEFAULT_WINDOW: usize = 7;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Pull a column out as f64 values, nulls as 0.
fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, TransformError> {
    let col_f64 = df.column(name)?.cast(&DataType::Float64)?;
    let ca = col_f64.f64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

/// First difference of a cumulative series. The first position has no prior
/// value and is 0 by convention.
fn daily_deltas(cumulative: &[f64]) -> Vec<f64> {
    cumulative
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == 0 { 0.0 } else { v - cumulative[i - 1] })
        .collect()
}

/// Trailing mean over `window` values, inclusive of the current position.
/// Positions where fewer than `window` values exist are 0.
fn trailing_means(values: &[f64], window: usize) -> Vec<f64> {
    let mut means = vec![0.0; values.len()];
    if window == 0 {
        return means;
    }
    for i in 0..values.len() {
        if i + 1 >= window {
            let start = i + 1 - window;
            means[i] = values[start..=i].iter().sum::<f64>() / window as f64;
        }
    }
    means
}

/// Filter the state-level feed to one state and append the derived columns:
/// `daily_cases`, `daily_deaths`, `average_cases`, `average_deaths`.
///
/// Rows keep their source order; the output has a contiguous 0-based row
/// position ("days since first case"). A state name matching no rows yields
/// an empty frame with the full output schema, not an error.
pub fn state_series(
    df: &DataFrame,
    state: &str,
    window: usize,
) -> Result<DataFrame, TransformError> {
    let mut filtered = df
        .clone()
        .lazy()
        .filter(col("state").eq(lit(state)))
        .collect()?;

    let cases = column_values(&filtered, "cases")?;
    let deaths = column_values(&filtered, "deaths")?;

    let daily_cases = daily_deltas(&cases);
    let daily_deaths = daily_deltas(&deaths);
    let average_cases = trailing_means(&daily_cases, window);
    let average_deaths = trailing_means(&daily_deaths, window);

    filtered.with_column(Column::new("daily_cases".into(), daily_cases))?;
    filtered.with_column(Column::new("daily_deaths".into(), daily_deaths))?;
    filtered.with_column(Column::new("average_cases".into(), average_cases))?;
    filtered.with_column(Column::new("average_deaths".into(), average_deaths))?;

    debug!(state, rows = filtered.height(), window, "state series derived");
    Ok(filtered)
}

/// `state_series` with the default 7-day window.
pub fn state_series_default(df: &DataFrame, state: &str) -> Result<DataFrame, TransformError> {
    state_series(df, state, DEFAULT_WINDOW)
}
