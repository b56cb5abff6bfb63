//! Popularity scoring.
//!
//! Each metric family is mapped into [0, 1] and combined as a weighted mean:
//!
//! - page views, discussion upvotes and video views are unbounded counts, so they
//!   go through `x / (x + k)` where `k` is the half-saturation reference;
//! - the trend index is already on a 0–100 scale and is divided by `trend_scale`.
//!
//! Every component is non-decreasing in its input, so the total is too.

use crate::domain::model::{
    DiscussionMetrics, PageViewMetrics, ScoreComponents, TrendMetrics, VideoMetrics,
};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative_finite, validate_positive_finite, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub trends: f64,
    pub page_views: f64,
    pub discussion: f64,
    pub video: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            trends: 0.35,
            page_views: 0.25,
            discussion: 0.20,
            video: 0.20,
        }
    }
}

impl ScoreWeights {
    fn sum(&self) -> f64 {
        self.trends + self.page_views + self.discussion + self.video
    }
}

/// Input value at which a count component reaches 0.5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreReferences {
    pub page_views: f64,
    pub discussion_upvotes: f64,
    pub video_views: f64,
    pub trend_scale: f64,
}

impl Default for ScoreReferences {
    fn default() -> Self {
        Self {
            page_views: 10_000.0,
            discussion_upvotes: 1_000.0,
            video_views: 100_000.0,
            trend_scale: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub references: ScoreReferences,
}

impl Validate for ScoringConfig {
    fn validate(&self) -> Result<()> {
        validate_non_negative_finite("scoring.weights.trends", self.weights.trends)?;
        validate_non_negative_finite("scoring.weights.page_views", self.weights.page_views)?;
        validate_non_negative_finite("scoring.weights.discussion", self.weights.discussion)?;
        validate_non_negative_finite("scoring.weights.video", self.weights.video)?;

        validate_positive_finite("scoring.references.page_views", self.references.page_views)?;
        validate_positive_finite(
            "scoring.references.discussion_upvotes",
            self.references.discussion_upvotes,
        )?;
        validate_positive_finite("scoring.references.video_views", self.references.video_views)?;
        validate_positive_finite("scoring.references.trend_scale", self.references.trend_scale)?;
        Ok(())
    }
}

/// The four averages the score is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreInputs {
    pub page_monthly_avg: f64,
    pub discussion_avg_upvotes: f64,
    pub video_avg_views: f64,
    pub trend_avg: f64,
}

impl ScoreInputs {
    pub fn from_metrics(
        page_views: &PageViewMetrics,
        discussion: &DiscussionMetrics,
        video: &VideoMetrics,
        trends: &TrendMetrics,
    ) -> Self {
        Self {
            page_monthly_avg: page_views.monthly_avg,
            discussion_avg_upvotes: discussion.avg_upvotes,
            video_avg_views: video.avg_views,
            trend_avg: trends.avg_value,
        }
    }
}

fn sanitize(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 {
        x
    } else if x == f64::INFINITY {
        f64::MAX
    } else {
        0.0
    }
}

/// `x / (x + k)`, in [0, 1).
pub fn saturate(x: f64, half_point: f64) -> f64 {
    let x = sanitize(x);
    if half_point <= 0.0 || !half_point.is_finite() {
        return if x > 0.0 { 1.0 } else { 0.0 };
    }
    // x / (x + k) == 1 / (1 + k / x); avoids x + k overflowing for huge x
    if x == 0.0 {
        0.0
    } else {
        (1.0 / (1.0 + half_point / x)).clamp(0.0, 1.0)
    }
}

pub fn components(inputs: &ScoreInputs, config: &ScoringConfig) -> ScoreComponents {
    let refs = &config.references;
    let trends = if refs.trend_scale > 0.0 {
        (sanitize(inputs.trend_avg) / refs.trend_scale).clamp(0.0, 1.0)
    } else {
        0.0
    };

    ScoreComponents {
        trends,
        page_views: saturate(inputs.page_monthly_avg, refs.page_views),
        discussion: saturate(inputs.discussion_avg_upvotes, refs.discussion_upvotes),
        video: saturate(inputs.video_avg_views, refs.video_views),
    }
}

/// Weighted mean of the components, always within [0, 1].
pub fn total_score(components: &ScoreComponents, weights: &ScoreWeights) -> f64 {
    let weight_sum = weights.sum();
    if !weight_sum.is_finite() || weight_sum <= 0.0 {
        return 0.0;
    }

    let raw = weights.trends * components.trends
        + weights.page_views * components.page_views
        + weights.discussion * components.discussion
        + weights.video * components.video;

    (raw / weight_sum).clamp(0.0, 1.0)
}

pub fn score(inputs: &ScoreInputs, config: &ScoringConfig) -> (ScoreComponents, f64) {
    let parts = components(inputs, config);
    let total = total_score(&parts, &config.weights);
    (parts, total)
}
