//! covid_trends - NYT COVID-19 time series analysis
//!
//! Fetches the New York Times state- and county-level COVID-19 feeds,
//! derives per-state daily deltas and trailing averages, and renders the two
//! trend charts (cases, deaths) as SVG files.
//!
//! Loading is explicit: nothing touches the network until
//! [`NytDataLoader::load_state_data`] or [`NytDataLoader::load_county_data`]
//! is called.
//!
//! ```no_run
//! use covid_trends::{state_report, NytDataLoader};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut loader = NytDataLoader::new();
//!     loader.load_state_data()?;
//!     state_report(&loader, "Washington", std::path::Path::new("."))?;
//!     Ok(())
//! }
//! ```

pub mod charts;
pub mod data;

pub use charts::{ChartError, ChartRenderer};
pub use data::{
    state_series, state_series_default, LoaderError, NytDataLoader, TransformError,
    DEFAULT_WINDOW,
};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use std::path::Path;

/// Derive the default-window series for one state and render both charts
/// into `out_dir` as `{state}_cases.svg` and `{state}_deaths.svg`.
///
/// Requires the state-level feed to be loaded. Returns the derived frame.
pub fn state_report(loader: &NytDataLoader, state: &str, out_dir: &Path) -> Result<DataFrame> {
    let df = loader
        .state_data()
        .context("state-level feed not loaded")?;
    let series = state_series_default(df, state)?;

    let slug = state.to_lowercase().replace(' ', "_");
    ChartRenderer::render_cases_chart(&series, state, &out_dir.join(format!("{slug}_cases.svg")))?;
    ChartRenderer::render_deaths_chart(
        &series,
        state,
        &out_dir.join(format!("{slug}_deaths.svg")),
    )?;

    Ok(series)
}
