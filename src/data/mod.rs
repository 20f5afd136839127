//! Data module - feed loading and series derivation

pub mod loader;
pub mod transform;

pub use loader::{LoaderError, NytDataLoader};
pub use transform::{state_series, state_series_default, TransformError, DEFAULT_WINDOW};
