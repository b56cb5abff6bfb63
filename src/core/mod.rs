pub mod aggregator;
pub mod normalize;
pub mod scoring;
pub mod trends;

pub use crate::domain::model::{AggregateResult, TrendMetrics};
pub use crate::domain::ports::{MetricsProvider, Storage, TrendSource, TrendStore};
pub use crate::utils::error::Result;
