// Provider payloads as they come off the wire. Only the fields we normalize are modelled.

use serde::{Deserialize, Serialize};

/// Wikimedia per-article pageviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageViewResponse {
    pub items: Vec<PageViewItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageViewItem {
    #[serde(default)]
    pub timestamp: String,
    pub views: u64,
}

/// Reddit search listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionListing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingChild {
    pub data: PostData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub ups: Option<i64>,
}

impl PostData {
    /// `score` wins over `ups`; negative scores count as zero.
    pub fn upvotes(&self) -> u64 {
        self.score.or(self.ups).unwrap_or(0).max(0) as u64
    }
}

/// YouTube search results plus the statistics lookup for the returned ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoPayload {
    pub search: VideoSearchResponse,
    pub statistics: VideoListResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoSearchResponse {
    #[serde(default)]
    pub items: Vec<VideoSearchItem>,
}

impl VideoSearchResponse {
    pub fn video_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| item.id.video_id.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSearchItem {
    pub id: VideoId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoId {
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount", default)]
    pub view_count: Option<CountValue>,
    #[serde(rename = "likeCount", default)]
    pub like_count: Option<CountValue>,
}

/// The Data API sends counts as decimal strings; accept plain numbers too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountValue {
    Number(u64),
    Text(String),
}

impl CountValue {
    pub fn as_count(&self) -> Option<u64> {
        match self {
            CountValue::Number(n) => Some(*n),
            CountValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_youtube_statistics_strings() {
        let json = serde_json::json!({
            "items": [
                {"id": "a", "statistics": {"viewCount": "1500", "likeCount": "20"}},
                {"id": "b", "statistics": {"viewCount": 300}},
                {"id": "c"}
            ]
        });
        let list: VideoListResponse = serde_json::from_value(json).unwrap();

        assert_eq!(list.items.len(), 3);
        let first = &list.items[0].statistics;
        assert_eq!(first.view_count.as_ref().and_then(CountValue::as_count), Some(1500));
        assert_eq!(first.like_count.as_ref().and_then(CountValue::as_count), Some(20));
        assert_eq!(
            list.items[1].statistics.view_count,
            Some(CountValue::Number(300))
        );
        assert!(list.items[2].statistics.view_count.is_none());
    }

    #[test]
    fn search_ids_skip_non_video_hits() {
        let json = serde_json::json!({
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "abc"}},
                {"id": {"kind": "youtube#channel", "channelId": "xyz"}}
            ]
        });
        let search: VideoSearchResponse = serde_json::from_value(json).unwrap();
        assert_eq!(search.video_ids(), vec!["abc"]);
    }

    #[test]
    fn post_upvotes_prefer_score_and_floor_at_zero() {
        let post = PostData {
            score: Some(-4),
            ups: Some(10),
            ..Default::default()
        };
        assert_eq!(post.upvotes(), 0);

        let post = PostData {
            ups: Some(10),
            ..Default::default()
        };
        assert_eq!(post.upvotes(), 10);
    }

    #[test]
    fn listing_ignores_fields_we_do_not_score() {
        let json = serde_json::json!({
            "kind": "Listing",
            "data": {"children": [
                {"kind": "t3", "data": {"title": "Pikachu fan art", "ups": 12, "num_comments": 3}}
            ]}
        });
        let listing: DiscussionListing = serde_json::from_value(json).unwrap();
        assert_eq!(listing.data.children[0].data.upvotes(), 12);
    }

    #[test]
    fn pageviews_without_items_is_malformed() {
        let result: std::result::Result<PageViewResponse, _> =
            serde_json::from_value(serde_json::json!({"detail": "not found"}));
        assert!(result.is_err());
    }
}
