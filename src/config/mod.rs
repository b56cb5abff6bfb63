#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{
    AppConfig, CacheConfig, DiscussionConfig, HttpConfig, PageViewConfig, TrendsConfig,
    VideoConfig,
};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, OutputFormat};
