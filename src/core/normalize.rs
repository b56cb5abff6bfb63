use crate::domain::model::{DiscussionMetrics, PageViewMetrics, VideoMetrics};
use crate::domain::raw::{CountValue, DiscussionListing, PageViewResponse, VideoPayload};

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// 把時間桶內的瀏覽數加總，再除以桶數
pub fn normalize_page_views(raw: &PageViewResponse) -> PageViewMetrics {
    let total_views = raw
        .items
        .iter()
        .fold(0u64, |acc, item| acc.saturating_add(item.views));

    PageViewMetrics {
        total_views,
        monthly_avg: average(total_views, raw.items.len() as u64),
    }
}

pub fn normalize_discussion(raw: &DiscussionListing) -> DiscussionMetrics {
    let posts = &raw.data.children;
    let total_posts = posts.len() as u64;
    let total_upvotes = posts
        .iter()
        .fold(0u64, |acc, post| acc.saturating_add(post.data.upvotes()));

    DiscussionMetrics {
        total_posts,
        total_upvotes,
        avg_upvotes: average(total_upvotes, total_posts),
    }
}

fn count_or_zero(value: Option<&CountValue>, field: &str, video_id: Option<&str>) -> u64 {
    match value {
        None => 0,
        Some(v) => v.as_count().unwrap_or_else(|| {
            tracing::warn!(
                "Skipping unparsable {} {:?} for video {}",
                field,
                v,
                video_id.unwrap_or("<unknown>")
            );
            0
        }),
    }
}

/// `total_videos` counts search hits, so videos without statistics still count
/// towards the average.
pub fn normalize_video(raw: &VideoPayload) -> VideoMetrics {
    let total_videos = raw.search.video_ids().len() as u64;

    let (total_views, total_likes) =
        raw.statistics
            .items
            .iter()
            .fold((0u64, 0u64), |(views, likes), item| {
                let id = item.id.as_deref();
                (
                    views.saturating_add(count_or_zero(
                        item.statistics.view_count.as_ref(),
                        "viewCount",
                        id,
                    )),
                    likes.saturating_add(count_or_zero(
                        item.statistics.like_count.as_ref(),
                        "likeCount",
                        id,
                    )),
                )
            });

    VideoMetrics {
        total_videos,
        total_views,
        total_likes,
        avg_views: average(total_views, total_videos),
    }
}
