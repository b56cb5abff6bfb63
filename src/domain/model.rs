use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page-view totals over the queried window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PageViewMetrics {
    pub total_views: u64,
    pub monthly_avg: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscussionMetrics {
    pub total_posts: u64,
    pub total_upvotes: u64,
    pub avg_upvotes: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetrics {
    pub total_videos: u64,
    pub total_views: u64,
    pub total_likes: u64,
    pub avg_views: f64,
}

/// Weekly popularity index (0–100 per point).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendMetrics {
    pub values: Vec<f64>,
    pub max_value: f64,
    pub avg_value: f64,
    pub is_fallback: bool,
}

impl TrendMetrics {
    pub fn from_values(values: Vec<f64>, is_fallback: bool) -> Self {
        let values: Vec<f64> = values
            .into_iter()
            .map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
            .collect();

        let max_value = values.iter().copied().fold(0.0, f64::max);
        let avg_value = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };

        Self {
            values,
            max_value,
            avg_value,
            is_fallback,
        }
    }
}

/// Per-family contribution to the score, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub trends: f64,
    pub page_views: f64,
    pub discussion: f64,
    pub video: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub name: String,
    pub page_views: PageViewMetrics,
    pub discussion: DiscussionMetrics,
    pub video: VideoMetrics,
    pub trends: TrendMetrics,
    pub score_components: ScoreComponents,
    pub total_score: f64,
    pub using_fallback_trends: bool,
    pub generated_at: DateTime<Utc>,
}
