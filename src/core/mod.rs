//! Core module for hoodrank
//!
//! Record types, the immutable dataset and the CSV loader.

mod dataset;
pub mod loader;
mod types;

pub use dataset::Dataset;
pub use loader::{load_dataset, read_dataset};
pub use types::*;
