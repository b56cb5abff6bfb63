pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use adapters::storage::LocalStorage;
pub use config::AppConfig;
pub use core::aggregator::{Aggregator, HttpAggregator};
pub use domain::model::AggregateResult;
pub use domain::names::{is_valid, CanonicalNameSet};
pub use utils::error::{PopularityError, Result};
