pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod runner;

// Re-export key items for convenience
pub use crate::analysis::{Answer, Intent, QueryDispatcher, RankingEngine};
pub use crate::config::{HoodrankConfig, OutputFormat, View};
pub use crate::core::{Dataset, NeighbourhoodRecord, Region, RegionFilter, ValueCategory, load_dataset};
pub use crate::error::HoodError;
pub use crate::runner::{render, run};
