use crate::domain::model::TrendMetrics;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// One remote data source. `fetch` returns the provider's raw payload untouched;
/// normalization happens in the aggregator once every fetch has settled.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    type Raw: Send;

    fn name(&self) -> &'static str;

    /// Checked before any network activity.
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch(&self, name: &str) -> Result<Self::Raw>;
}

/// Genuine weekly trend data. `Ok(None)` means the source had nothing for this name.
#[async_trait]
pub trait TrendSource: Send + Sync {
    async fn fetch_trends(&self, name: &str) -> Result<Option<Vec<f64>>>;
}

/// Best-effort persistence of resolved trend data.
#[async_trait]
pub trait TrendStore: Send + Sync {
    async fn load(&self, name: &str) -> Option<TrendMetrics>;
    async fn store(&self, name: &str, trends: &TrendMetrics);
}
