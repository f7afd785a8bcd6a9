//! Static chart rendering.

pub mod plotter;

pub use plotter::{ChartError, ChartPlotter};
