use crate::adapters::cache::TrendCache;
use crate::adapters::http::{
    build_client, HttpTrendsSource, RedditSearch, WikipediaPageViews, YouTubeSearch,
};
use crate::adapters::storage::LocalStorage;
use crate::config::AppConfig;
use crate::core::normalize::{normalize_discussion, normalize_page_views, normalize_video};
use crate::core::scoring::{self, ScoreInputs, ScoringConfig};
use crate::core::trends::TrendResolver;
use crate::domain::model::AggregateResult;
use crate::domain::ports::MetricsProvider;
use crate::domain::raw::{DiscussionListing, PageViewResponse, VideoPayload};
use crate::utils::error::{PopularityError, Result};
use crate::utils::validation::Validate;
use std::sync::Arc;
use std::time::Instant;

/// Fans a query out to the three providers and folds the answers into one score.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
pub struct Aggregator<P, D, V> {
    page_views: P,
    discussion: D,
    video: V,
    trends: TrendResolver,
    scoring: ScoringConfig,
}

pub type HttpAggregator = Aggregator<WikipediaPageViews, RedditSearch, YouTubeSearch>;

impl<P, D, V> Aggregator<P, D, V>
where
    P: MetricsProvider<Raw = PageViewResponse>,
    D: MetricsProvider<Raw = DiscussionListing>,
    V: MetricsProvider<Raw = VideoPayload>,
{
    pub fn new(page_views: P, discussion: D, video: V, scoring: ScoringConfig) -> Self {
        Self {
            page_views,
            discussion,
            video,
            trends: TrendResolver::new(),
            scoring,
        }
    }

    pub fn with_trends(mut self, trends: TrendResolver) -> Self {
        self.trends = trends;
        self
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    fn ensure_configured(&self) -> Result<()> {
        self.page_views.ensure_configured()?;
        self.discussion.ensure_configured()?;
        self.video.ensure_configured()
    }

    /// Fails with `EmptyInput` for a blank name, a configuration error when a
    /// provider is missing its credential, and a provider error if any of the
    /// three fetches fails. No partial result is ever produced.
    pub async fn aggregate(&self, name: &str) -> Result<AggregateResult> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PopularityError::EmptyInput);
        }
        self.ensure_configured()?;

        let started = Instant::now();
        tracing::info!("🔍 Aggregating popularity metrics for {}", name);

        // 三個 provider 同時發出；任何一個失敗就整體失敗
        let (page_raw, discussion_raw, video_raw, trends) = tokio::try_join!(
            self.page_views.fetch(name),
            self.discussion.fetch(name),
            self.video.fetch(name),
            async { Ok::<_, PopularityError>(self.trends.resolve(name).await) },
        )
        .inspect_err(|e| tracing::warn!("Aggregation for {} aborted: {}", name, e))?;

        let page_views = normalize_page_views(&page_raw);
        let discussion = normalize_discussion(&discussion_raw);
        let video = normalize_video(&video_raw);

        let inputs = ScoreInputs::from_metrics(&page_views, &discussion, &video, &trends);
        let (score_components, total_score) = scoring::score(&inputs, &self.scoring);

        tracing::info!(
            "✅ {} scored {:.3} in {:?} (fallback trends: {})",
            name,
            total_score,
            started.elapsed(),
            trends.is_fallback
        );

        Ok(AggregateResult {
            name: name.to_string(),
            page_views,
            discussion,
            video,
            using_fallback_trends: trends.is_fallback,
            trends,
            score_components,
            total_score,
            generated_at: chrono::Utc::now(),
        })
    }
}

impl HttpAggregator {
    /// Validates `config`, then wires the HTTP providers, optional trends source
    /// and trend cache.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let client = build_client(&config.http)?;

        let page_views = WikipediaPageViews::new(client.clone(), &config.page_views);
        let discussion = RedditSearch::new(client.clone(), &config.discussion);
        let video = YouTubeSearch::new(client.clone(), &config.video);
        video.ensure_configured()?;

        let mut trends = TrendResolver::new();
        if let Some(endpoint) = &config.trends.endpoint {
            trends = trends.with_source(Arc::new(HttpTrendsSource::new(client, endpoint.clone())));
        }
        if config.cache.enabled {
            let storage = LocalStorage::new(config.cache.dir.clone());
            trends = trends.with_store(Arc::new(TrendCache::new(
                storage,
                config.cache.expire_after_secs,
            )));
        }

        Ok(Self::new(page_views, discussion, video, config.scoring).with_trends(trends))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::raw::{
        ListingChild, ListingData, PageViewItem, PostData, VideoId, VideoSearchItem,
        VideoSearchResponse,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubPageViews {
        views: Vec<u64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetricsProvider for StubPageViews {
        type Raw = PageViewResponse;

        fn name(&self) -> &'static str {
            "page-views"
        }

        async fn fetch(&self, _name: &str) -> Result<PageViewResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PageViewResponse {
                items: self
                    .views
                    .iter()
                    .map(|v| PageViewItem {
                        timestamp: String::new(),
                        views: *v,
                    })
                    .collect(),
            })
        }
    }

    struct StubDiscussion {
        scores: Vec<i64>,
        fail: bool,
    }

    #[async_trait]
    impl MetricsProvider for StubDiscussion {
        type Raw = DiscussionListing;

        fn name(&self) -> &'static str {
            "discussion"
        }

        async fn fetch(&self, _name: &str) -> Result<DiscussionListing> {
            if self.fail {
                return Err(PopularityError::provider(self.name(), "HTTP 503"));
            }
            Ok(DiscussionListing {
                data: ListingData {
                    children: self
                        .scores
                        .iter()
                        .map(|s| ListingChild {
                            data: PostData {
                                score: Some(*s),
                                ..Default::default()
                            },
                        })
                        .collect(),
                },
            })
        }
    }

    struct StubVideo {
        key: Option<String>,
        count: usize,
        delay: Duration,
    }

    #[async_trait]
    impl MetricsProvider for StubVideo {
        type Raw = VideoPayload;

        fn name(&self) -> &'static str {
            "video"
        }

        fn ensure_configured(&self) -> Result<()> {
            match self.key {
                Some(_) => Ok(()),
                None => Err(PopularityError::MissingConfig {
                    field: "video.api_key".to_string(),
                }),
            }
        }

        async fn fetch(&self, _name: &str) -> Result<VideoPayload> {
            tokio::time::sleep(self.delay).await;
            Ok(VideoPayload {
                search: VideoSearchResponse {
                    items: (0..self.count)
                        .map(|i| VideoSearchItem {
                            id: VideoId {
                                video_id: Some(format!("v{}", i)),
                            },
                        })
                        .collect(),
                },
                ..Default::default()
            })
        }
    }

    fn aggregator(
        discussion_fails: bool,
        key: Option<&str>,
    ) -> Aggregator<StubPageViews, StubDiscussion, StubVideo> {
        Aggregator::new(
            StubPageViews {
                views: vec![100_000; 12],
                calls: AtomicUsize::new(0),
            },
            StubDiscussion {
                scores: vec![500; 100],
                fail: discussion_fails,
            },
            StubVideo {
                key: key.map(str::to_string),
                count: 50,
                delay: Duration::from_millis(10),
            },
            ScoringConfig::default(),
        )
    }

    #[tokio::test]
    async fn aggregates_all_providers() {
        let agg = aggregator(false, Some("key"));
        let result = agg.aggregate("  pikachu ").await.unwrap();

        assert_eq!(result.name, "pikachu");
        assert_eq!(result.page_views.total_views, 1_200_000);
        assert_eq!(result.page_views.monthly_avg, 100_000.0);
        assert_eq!(result.discussion.avg_upvotes, 500.0);
        assert_eq!(result.video.total_videos, 50);
        assert!(result.using_fallback_trends);
        assert!(result.trends.is_fallback);
        assert!((0.0..=1.0).contains(&result.total_score));
    }

    #[tokio::test]
    async fn empty_name_fails_before_any_fetch() {
        let agg = aggregator(false, Some("key"));
        let err = agg.aggregate("   ").await.unwrap_err();

        assert!(matches!(err, PopularityError::EmptyInput));
        assert_eq!(agg.page_views.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_fetch() {
        let agg = aggregator(false, None);
        let err = agg.aggregate("pikachu").await.unwrap_err();

        assert!(matches!(err, PopularityError::MissingConfig { .. }));
        assert_eq!(agg.page_views.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_failing_provider_fails_the_whole_aggregation() {
        let agg = aggregator(true, Some("key"));
        let err = agg.aggregate("pikachu").await.unwrap_err();

        assert!(matches!(err, PopularityError::Provider { .. }));
        assert_eq!(err.user_friendly_message(), "Error fetching data.");
    }

    #[tokio::test]
    async fn repeated_aggregations_are_reproducible() {
        let agg = aggregator(false, Some("key"));
        let first = agg.aggregate("pikachu").await.unwrap();
        let second = agg.aggregate("pikachu").await.unwrap();

        assert_eq!(first.trends, second.trends);
        assert_eq!(first.total_score, second.total_score);
        assert_eq!(first.score_components, second.score_components);
    }

    #[tokio::test]
    async fn aggregator_is_shareable_across_tasks() {
        let agg = Arc::new(aggregator(false, Some("key")));
        let handles: Vec<_> = ["pikachu", "eevee", "onix"]
            .into_iter()
            .map(|name| {
                let agg = agg.clone();
                tokio::spawn(async move { agg.aggregate(name).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(agg.page_views.calls.load(Ordering::SeqCst), 3);
    }
}
