use crate::config::{DiscussionConfig, HttpConfig, PageViewConfig, VideoConfig};
use crate::domain::ports::{MetricsProvider, TrendSource};
use crate::domain::raw::{
    DiscussionListing, PageViewResponse, VideoListResponse, VideoPayload, VideoSearchResponse,
};
use crate::utils::error::{PopularityError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use url::Url;

pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|e| PopularityError::Configuration {
            message: format!("failed to build HTTP client: {}", e),
        })
}

/// reqwest 的錯誤訊息會帶完整 URL；query 裡有 API key，只保留 scheme/host/path
fn redact(e: reqwest::Error) -> String {
    let target = e.url().map(|url| {
        let mut url = url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    });
    let e = e.without_url();
    match target {
        Some(target) => format!("{} ({})", e, target),
        None => e.to_string(),
    }
}

/// 送出請求並解析 JSON；傳輸錯誤、非 2xx、格式錯誤都算 provider 失敗
async fn get_json<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> Result<T> {
    let response = request.send().await.map_err(|e| {
        PopularityError::provider(provider, format!("request failed: {}", redact(e)))
    })?;

    let status = response.status();
    tracing::debug!("{} response status: {}", provider, status);
    if !status.is_success() {
        return Err(PopularityError::provider(
            provider,
            format!("unexpected status {}", status),
        ));
    }

    response.json::<T>().await.map_err(|e| {
        PopularityError::provider(provider, format!("malformed response: {}", redact(e)))
    })
}

/// Wikimedia pageviews per-article endpoint.
pub struct WikipediaPageViews {
    client: Client,
    endpoint: String,
    window_days: u32,
}

impl WikipediaPageViews {
    pub fn new(client: Client, config: &PageViewConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            window_days: config.window_days,
        }
    }

    /// "mr. mime" -> "Mr._mime"
    pub fn article_title(name: &str) -> String {
        let mut chars = name.trim().chars();
        let title: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        title.replace(' ', "_")
    }

    pub fn request_url(&self, name: &str, today: NaiveDate) -> Result<Url> {
        let start = today
            .checked_sub_days(Days::new(u64::from(self.window_days)))
            .ok_or_else(|| PopularityError::InvalidConfigValue {
                field: "page_views.window_days".to_string(),
                value: self.window_days.to_string(),
                reason: format!("window reaches before the earliest date from {}", today),
            })?;
        let mut url = Url::parse(&self.endpoint).map_err(|e| PopularityError::Configuration {
            message: format!("invalid page_views.endpoint: {}", e),
        })?;

        url.path_segments_mut()
            .map_err(|_| PopularityError::Configuration {
                message: "page_views.endpoint cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .push(&Self::article_title(name))
            .push("monthly")
            .push(&format!("{}00", start.format("%Y%m%d")))
            .push(&format!("{}00", today.format("%Y%m%d")));

        Ok(url)
    }
}

#[async_trait]
impl MetricsProvider for WikipediaPageViews {
    type Raw = PageViewResponse;

    fn name(&self) -> &'static str {
        "page-views"
    }

    async fn fetch(&self, name: &str) -> Result<PageViewResponse> {
        let url = self.request_url(name, Utc::now().date_naive())?;
        tracing::debug!("Making page-view request to: {}", url);

        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        get_json(self.name(), request).await
    }
}

/// Reddit search listing.
pub struct RedditSearch {
    client: Client,
    endpoint: String,
    limit: u32,
}

impl RedditSearch {
    pub fn new(client: Client, config: &DiscussionConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            limit: config.limit,
        }
    }
}

#[async_trait]
impl MetricsProvider for RedditSearch {
    type Raw = DiscussionListing;

    fn name(&self) -> &'static str {
        "discussion"
    }

    async fn fetch(&self, name: &str) -> Result<DiscussionListing> {
        tracing::debug!("Searching discussions for: {}", name);
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("q", name.to_string()), ("limit", self.limit.to_string())]);
        get_json(self.name(), request).await
    }
}

/// YouTube Data API: search, then a statistics lookup for the hits.
pub struct YouTubeSearch {
    client: Client,
    search_endpoint: String,
    videos_endpoint: String,
    max_results: u32,
    api_key: Option<String>,
}

impl YouTubeSearch {
    pub fn new(client: Client, config: &VideoConfig) -> Self {
        Self {
            client,
            search_endpoint: config.search_endpoint.clone(),
            videos_endpoint: config.videos_endpoint.clone(),
            max_results: config.max_results,
            api_key: config.api_key().map(str::to_string),
        }
    }

    fn key(&self) -> Result<&str> {
        validate_required_field("video.api_key", &self.api_key).map(String::as_str)
    }
}

#[async_trait]
impl MetricsProvider for YouTubeSearch {
    type Raw = VideoPayload;

    fn name(&self) -> &'static str {
        "video"
    }

    fn ensure_configured(&self) -> Result<()> {
        self.key().map(|_| ())
    }

    async fn fetch(&self, name: &str) -> Result<VideoPayload> {
        let key = self.key()?;

        tracing::debug!("Searching videos for: pokemon {}", name);
        let search_request = self.client.get(&self.search_endpoint).query(&[
            ("part", "snippet".to_string()),
            ("q", format!("pokemon {}", name)),
            ("type", "video".to_string()),
            ("maxResults", self.max_results.to_string()),
            ("key", key.to_string()),
        ]);
        let search: VideoSearchResponse = get_json(self.name(), search_request).await?;

        let ids = search.video_ids();
        if ids.is_empty() {
            tracing::warn!("No videos found for {}", name);
            return Ok(VideoPayload {
                search,
                statistics: VideoListResponse::default(),
            });
        }

        tracing::debug!("Found {} videos, fetching statistics", ids.len());
        let stats_request = self.client.get(&self.videos_endpoint).query(&[
            ("part", "statistics".to_string()),
            ("id", ids.join(",")),
            ("key", key.to_string()),
        ]);
        let statistics: VideoListResponse = get_json(self.name(), stats_request).await?;

        Ok(VideoPayload { search, statistics })
    }
}

/// Trends service answering `?pokemon=<name>` with `{ "<Name>": { "<timestamp>": value } }`.
pub struct HttpTrendsSource {
    client: Client,
    endpoint: String,
}

impl HttpTrendsSource {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

/// Picks the column matching `name` (any casing), or the only column there is.
fn trend_column(
    mut columns: HashMap<String, BTreeMap<String, f64>>,
    name: &str,
) -> Option<Vec<f64>> {
    let key = columns
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .cloned()
        .or_else(|| {
            if columns.len() == 1 {
                columns.keys().next().cloned()
            } else {
                None
            }
        })?;

    // BTreeMap 依時間字串排序
    columns.remove(&key).map(|series| series.into_values().collect())
}

#[async_trait]
impl TrendSource for HttpTrendsSource {
    async fn fetch_trends(&self, name: &str) -> Result<Option<Vec<f64>>> {
        let request = self.client.get(&self.endpoint).query(&[("pokemon", name)]);
        let columns: HashMap<String, BTreeMap<String, f64>> = get_json("trends", request).await?;
        Ok(trend_column(columns, name).filter(|values| !values.is_empty()))
    }
}
