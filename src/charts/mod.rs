//! Charts module - chart rendering

pub mod renderer;

pub use renderer::{ChartError, ChartRenderer};
