use crate::config::AppConfig;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pokemon-popularity")]
#[command(about = "Measure how popular a Pokémon is across page views, discussions and videos")]
pub struct CliConfig {
    /// Pokémon name to look up
    pub name: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// API key for the video search provider
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// Endpoint of a trends service answering `?pokemon=<name>`
    #[arg(long)]
    pub trends_endpoint: Option<String>,

    /// Disable the on-disk trend cache
    #[arg(long)]
    pub no_cache: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also write the weekly trend series to this CSV file
    #[arg(long)]
    pub trends_csv: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋 TOML 設定
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(key) = &self.youtube_api_key {
            config.video.api_key = Some(key.clone());
        }
        if let Some(endpoint) = &self.trends_endpoint {
            config.trends.endpoint = Some(endpoint.clone());
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
    }
}
