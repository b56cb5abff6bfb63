use crate::core::scoring::ScoringConfig;
use crate::utils::error::{PopularityError, Result};
use crate::utils::validation::{
    validate_at_least, validate_dir, validate_endpoint, validate_non_empty, validate_range,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_USER_AGENT: &str = "PokemonPopularityApp/1.0";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub page_views: PageViewConfig,
    pub discussion: DiscussionConfig,
    pub video: VideoConfig,
    pub trends: TrendsConfig,
    pub scoring: ScoringConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageViewConfig {
    pub endpoint: String,
    pub window_days: u32,
}

impl Default for PageViewConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://wikimedia.org/api/rest_v1/metrics/pageviews/per-article/en.wikipedia/all-access/all-agents".to_string(),
            window_days: 365,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionConfig {
    pub endpoint: String,
    pub limit: u32,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.reddit.com/search.json".to_string(),
            limit: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub search_endpoint: String,
    pub videos_endpoint: String,
    pub max_results: u32,
    pub api_key: Option<String>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            search_endpoint: "https://www.googleapis.com/youtube/v3/search".to_string(),
            videos_endpoint: "https://www.googleapis.com/youtube/v3/videos".to_string(),
            max_results: 50,
            api_key: None,
        }
    }
}

impl VideoConfig {
    /// 空字串或未替換的 `${VAR}` 都視為沒有設定
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.contains("${"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsConfig {
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub dir: String,
    pub expire_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: "cache".to_string(),
            expire_after_secs: 86_400,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PopularityError::Configuration {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${YOUTUBE_API_KEY})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PopularityError::Configuration {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_at_least("http.timeout_seconds", self.http.timeout_seconds, 1)?;
        validate_non_empty("http.user_agent", &self.http.user_agent)?;

        validate_endpoint("page_views.endpoint", &self.page_views.endpoint)?;
        validate_range("page_views.window_days", self.page_views.window_days, 1, 3650)?;

        validate_endpoint("discussion.endpoint", &self.discussion.endpoint)?;
        validate_range("discussion.limit", self.discussion.limit, 1, 100)?;

        validate_endpoint("video.search_endpoint", &self.video.search_endpoint)?;
        validate_endpoint("video.videos_endpoint", &self.video.videos_endpoint)?;
        validate_range("video.max_results", self.video.max_results, 1, 50)?;

        if let Some(endpoint) = &self.trends.endpoint {
            validate_endpoint("trends.endpoint", endpoint)?;
        }

        if self.cache.enabled {
            validate_dir("cache.dir", &self.cache.dir)?;
        }

        self.scoring.validate()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.discussion.limit, 100);
        assert_eq!(config.video.max_results, 50);
        assert_eq!(config.page_views.window_days, 365);
        assert_eq!(config.scoring.weights.trends, 0.35);
        assert!(config.video.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sections() {
        let toml_content = r#"
[http]
timeout_seconds = 5

[discussion]
endpoint = "https://reddit.example.com/search.json"
limit = 25

[video]
api_key = "abc123"

[trends]
endpoint = "http://localhost:5000/trends"

[scoring.weights]
trends = 0.0
video = 0.5

[cache]
enabled = false
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.http.timeout_seconds, 5);
        assert_eq!(config.discussion.limit, 25);
        assert_eq!(config.video.api_key(), Some("abc123"));
        assert_eq!(
            config.trends.endpoint.as_deref(),
            Some("http://localhost:5000/trends")
        );
        assert_eq!(config.scoring.weights.trends, 0.0);
        assert_eq!(config.scoring.weights.video, 0.5);
        assert_eq!(config.scoring.weights.page_views, 0.25);
        assert!(!config.cache.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PP_TEST_YOUTUBE_KEY", "from-env");

        let config = AppConfig::from_toml_str(
            r#"
[video]
api_key = "${PP_TEST_YOUTUBE_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.video.api_key(), Some("from-env"));

        std::env::remove_var("PP_TEST_YOUTUBE_KEY");
    }

    #[test]
    fn unresolved_placeholder_leaves_key_missing() {
        let config = AppConfig::from_toml_str(
            r#"
[video]
api_key = "${PP_TEST_DEFINITELY_UNSET_KEY}"
"#,
        )
        .unwrap();
        assert!(config.video.api_key().is_none());
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[discussion]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[video]
max_results = 500
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[video]
search_endpoint = "https://www.googleapis.com/youtube/v3/search?key=inline"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(PopularityError::InvalidConfigValue { ref field, .. }) if field == "video.search_endpoint"
        ));
    }

    #[test]
    fn invalid_toml_is_a_configuration_error() {
        assert!(matches!(
            AppConfig::from_toml_str("[video\napi_key ="),
            Err(PopularityError::Configuration { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[page_views]\nwindow_days = 30\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.page_views.window_days, 30);
    }
}
