use crate::domain::model::TrendMetrics;
use crate::domain::ports::{Storage, TrendStore};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// 一百年；避免 Duration 溢位
const MAX_EXPIRY_SECS: u64 = 100 * 365 * 24 * 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTrends {
    pub cached_at: DateTime<Utc>,
    pub trends: TrendMetrics,
}

/// JSON-file trend cache on top of a `Storage`. Any problem is a miss.
pub struct TrendCache<S: Storage> {
    storage: S,
    expire_after: Duration,
}

impl<S: Storage> TrendCache<S> {
    pub fn new(storage: S, expire_after_secs: u64) -> Self {
        Self {
            storage,
            expire_after: Duration::seconds(expire_after_secs.min(MAX_EXPIRY_SECS) as i64),
        }
    }

    pub fn file_name(name: &str) -> String {
        let safe: String = name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_string()
                } else {
                    format!("_{:x}", c as u32)
                }
            })
            .collect();
        format!("trends_{}.json", safe)
    }

    pub async fn load_at(&self, name: &str, now: DateTime<Utc>) -> Option<TrendMetrics> {
        let bytes = match self.storage.read_file(&Self::file_name(name)).await {
            Ok(bytes) => bytes,
            Err(_) => return None,
        };

        let entry: CachedTrends = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Ignoring unreadable trend cache for {}: {}", name, e);
                return None;
            }
        };

        if now - entry.cached_at >= self.expire_after {
            tracing::debug!("Trend cache for {} expired", name);
            return None;
        }
        Some(entry.trends)
    }

    pub async fn store_at(&self, name: &str, trends: &TrendMetrics, now: DateTime<Utc>) {
        let entry = CachedTrends {
            cached_at: now,
            trends: trends.clone(),
        };

        let result = match serde_json::to_vec(&entry) {
            Ok(bytes) => self.storage.write_file(&Self::file_name(name), &bytes).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!("Error saving trend cache for {}: {}", name, e);
        }
    }
}

#[async_trait]
impl<S: Storage> TrendStore for TrendCache<S> {
    async fn load(&self, name: &str) -> Option<TrendMetrics> {
        self.load_at(name, Utc::now()).await
    }

    async fn store(&self, name: &str, trends: &TrendMetrics) {
        self.store_at(name, trends, Utc::now()).await
    }
}
