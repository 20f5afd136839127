//! NYT Data Loader Module
//! Fetches the New York Times COVID-19 CSV feeds and parses them with Polars.

use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, info};

/// State-level feed: date, state, fips, cases, deaths.
pub const NYT_STATE_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-states.csv";

/// County-level feed: date, county, state, fips, cases, deaths.
pub const NYT_COUNTY_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-counties.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch feed: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Parse CSV text (header row expected) into a DataFrame.
pub fn parse_csv(text: &str) -> Result<DataFrame, LoaderError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .into_reader_with_file_handle(Cursor::new(text))
        .finish()?;
    Ok(df)
}

/// GET a CSV resource and parse it. Non-2xx responses and unreachable hosts
/// propagate; there is no retry or timeout handling.
fn fetch_csv(url: &str) -> Result<DataFrame, LoaderError> {
    info!(%url, "fetching feed");
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    let df = parse_csv(&body)?;
    debug!(rows = df.height(), "feed parsed");
    Ok(df)
}

/// Handles fetching and caching of the two NYT feeds. Nothing is loaded until
/// a `load_*` method is called; each call performs a fresh network request.
pub struct NytDataLoader {
    state_df: Option<DataFrame>,
    county_df: Option<DataFrame>,
}

impl Default for NytDataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl NytDataLoader {
    pub fn new() -> Self {
        Self {
            state_df: None,
            county_df: None,
        }
    }

    /// Fetch and parse the state-level feed.
    pub fn load_state_data(&mut self) -> Result<&DataFrame, LoaderError> {
        let df = fetch_csv(NYT_STATE_URL)?;
        self.state_df = Some(df);
        self.state_df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Fetch and parse the county-level feed.
    pub fn load_county_data(&mut self) -> Result<&DataFrame, LoaderError> {
        let df = fetch_csv(NYT_COUNTY_URL)?;
        self.county_df = Some(df);
        self.county_df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get a reference to the loaded state-level DataFrame.
    pub fn state_data(&self) -> Option<&DataFrame> {
        self.state_df.as_ref()
    }

    /// Get a reference to the loaded county-level DataFrame.
    pub fn county_data(&self) -> Option<&DataFrame> {
        self.county_df.as_ref()
    }

    /// Get the number of state-level rows loaded.
    pub fn state_row_count(&self) -> usize {
        self.state_df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get list of column names from the loaded state-level DataFrame.
    pub fn state_columns(&self) -> Vec<String> {
        self.state_df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of county-level rows loaded.
    pub fn county_row_count(&self) -> usize {
        self.county_df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get list of column names from the loaded county-level DataFrame.
    pub fn county_columns(&self) -> Vec<String> {
        self.county_df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set the state-level DataFrame directly (used for offline data).
    pub fn set_state_data(&mut self, df: DataFrame) {
        self.state_df = Some(df);
    }

    /// Set the county-level DataFrame directly (used for offline data).
    pub fn set_county_data(&mut self, df: DataFrame) {
        self.county_df = Some(df);
    }
}
