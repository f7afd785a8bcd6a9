//! Data loading, cleaning, and order aggregation.

pub mod cleaner;
pub mod loader;
pub mod orders;

pub use cleaner::{CleanerError, DataCleaner, OrderLine};
pub use loader::{DataLoader, LoaderError};
pub use orders::{Order, OrderAggregator, OrderError};
