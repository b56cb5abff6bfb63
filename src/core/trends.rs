use crate::domain::model::TrendMetrics;
use crate::domain::ports::{TrendSource, TrendStore};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;
use std::sync::Arc;

/// Five years of weekly points.
pub const FALLBACK_WEEKS: usize = 260;
const WEEKS_PER_YEAR: f64 = 52.0;
const SEASONAL_AMPLITUDE: f64 = 10.0;

const HIGH_TIER: &[&str] = &[
    "pikachu", "charizard", "mewtwo", "mew", "dragonite", "gyarados", "gengar", "snorlax",
];
const MID_TIER: &[&str] = &[
    "bulbasaur", "squirtle", "eevee", "arcanine", "alakazam", "blastoise", "venusaur", "lapras",
    "raichu", "machamp",
];
const LOW_TIER: &[&str] = &[
    "rattata", "pidgey", "weedle", "caterpie", "metapod", "kakuna", "magikarp", "zubat", "ekans",
    "spearow",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularityTier {
    High,
    Mid,
    Low,
    Standard,
}

impl PopularityTier {
    pub fn of(name: &str) -> Self {
        let name = name.to_lowercase();
        let name = name.as_str();
        if HIGH_TIER.contains(&name) {
            PopularityTier::High
        } else if MID_TIER.contains(&name) {
            PopularityTier::Mid
        } else if LOW_TIER.contains(&name) {
            PopularityTier::Low
        } else {
            PopularityTier::Standard
        }
    }

    /// (base range, variance)
    fn shape(self) -> ((f64, f64), f64) {
        match self {
            PopularityTier::High => ((70.0, 100.0), 15.0),
            PopularityTier::Mid => ((40.0, 70.0), 10.0),
            PopularityTier::Low => ((5.0, 20.0), 5.0),
            PopularityTier::Standard => ((20.0, 40.0), 8.0),
        }
    }
}

// FNV-1a; std's hasher is not stable across releases
fn name_seed(name: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    name.to_lowercase()
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(PRIME))
}

/// Estimated weekly trend series, reproducible for a given name.
pub fn fallback_trends(name: &str) -> TrendMetrics {
    let tier = PopularityTier::of(name);
    let ((low, high), variance) = tier.shape();
    let mut rng = ChaCha8Rng::seed_from_u64(name_seed(name));

    let base: f64 = rng.gen_range(low..high);
    let values = (0..FALLBACK_WEEKS)
        .map(|week| {
            let seasonal = SEASONAL_AMPLITUDE * (2.0 * PI * week as f64 / WEEKS_PER_YEAR).sin();
            let noise: f64 = rng.gen_range(-variance..variance);
            (base + seasonal + noise).clamp(0.0, 100.0)
        })
        .collect();

    TrendMetrics::from_values(values, true)
}

/// Resolves trend data: cache first, then the genuine source, then the estimate.
/// Never fails.
#[derive(Clone, Default)]
pub struct TrendResolver {
    source: Option<Arc<dyn TrendSource>>,
    store: Option<Arc<dyn TrendStore>>,
}

impl TrendResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn TrendSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn TrendStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn resolve(&self, name: &str) -> TrendMetrics {
        if let Some(store) = &self.store {
            if let Some(cached) = store.load(name).await {
                tracing::debug!("Using cached trends data for {}", name);
                return cached;
            }
        }

        let trends = match self.fetch_genuine(name).await {
            Some(trends) => trends,
            None => {
                tracing::info!("📉 Using estimated trend data for {}", name);
                fallback_trends(name)
            }
        };

        if let Some(store) = &self.store {
            store.store(name, &trends).await;
        }

        trends
    }

    async fn fetch_genuine(&self, name: &str) -> Option<TrendMetrics> {
        let source = self.source.as_ref()?;
        match source.fetch_trends(name).await {
            Ok(Some(values)) if !values.is_empty() => {
                tracing::debug!("Fetched {} trend points for {}", values.len(), name);
                Some(TrendMetrics::from_values(values, false))
            }
            Ok(_) => {
                tracing::warn!("Trends source returned no data for {}", name);
                None
            }
            Err(e) => {
                tracing::warn!("Trends source unavailable for {}: {}", name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{PopularityError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[test]
    fn fallback_is_deterministic_per_name() {
        let a = fallback_trends("pikachu");
        let b = fallback_trends("Pikachu");
        assert_eq!(a, b);
        assert!(a.is_fallback);
        assert_eq!(a.values.len(), FALLBACK_WEEKS);
    }

    #[test]
    fn different_names_get_different_series() {
        assert_ne!(fallback_trends("pikachu").values, fallback_trends("raichu").values);
    }

    #[test]
    fn fallback_values_stay_in_range() {
        for name in ["pikachu", "eevee", "magikarp", "ditto", "mr. mime"] {
            let trends = fallback_trends(name);
            assert!(trends.values.iter().all(|v| (0.0..=100.0).contains(v)));
            assert!(trends.max_value <= 100.0);
        }
    }

    #[test]
    fn tiers_shape_the_average() {
        let high = fallback_trends("charizard").avg_value;
        let low = fallback_trends("rattata").avg_value;
        assert!(high > low, "{} should exceed {}", high, low);
        assert_eq!(PopularityTier::of("GENGAR"), PopularityTier::High);
        assert_eq!(PopularityTier::of("ditto"), PopularityTier::Standard);
    }

    struct FixedSource(Result<Option<Vec<f64>>>);

    #[async_trait]
    impl TrendSource for FixedSource {
        async fn fetch_trends(&self, _name: &str) -> Result<Option<Vec<f64>>> {
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(_) => Err(PopularityError::provider("trends", "unavailable")),
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<String, TrendMetrics>>,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl TrendStore for MemoryStore {
        async fn load(&self, name: &str) -> Option<TrendMetrics> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.entries.lock().await.get(name).cloned()
        }

        async fn store(&self, name: &str, trends: &TrendMetrics) {
            self.entries
                .lock()
                .await
                .insert(name.to_string(), trends.clone());
        }
    }

    #[tokio::test]
    async fn resolver_without_source_falls_back() {
        let trends = TrendResolver::new().resolve("snorlax").await;
        assert!(trends.is_fallback);
        assert_eq!(trends, fallback_trends("snorlax"));
    }

    #[tokio::test]
    async fn resolver_prefers_genuine_data() {
        let resolver =
            TrendResolver::new().with_source(Arc::new(FixedSource(Ok(Some(vec![40.0, 60.0])))));
        let trends = resolver.resolve("snorlax").await;
        assert!(!trends.is_fallback);
        assert_eq!(trends.avg_value, 50.0);
    }

    #[tokio::test]
    async fn resolver_falls_back_on_source_error_or_empty_data() {
        let failing = TrendResolver::new().with_source(Arc::new(FixedSource(Err(
            PopularityError::provider("trends", "down"),
        ))));
        assert!(failing.resolve("mew").await.is_fallback);

        let empty = TrendResolver::new().with_source(Arc::new(FixedSource(Ok(Some(vec![])))));
        assert!(empty.resolve("mew").await.is_fallback);

        let missing = TrendResolver::new().with_source(Arc::new(FixedSource(Ok(None))));
        assert_eq!(missing.resolve("mew").await, fallback_trends("mew"));
    }

    #[tokio::test]
    async fn resolver_reads_through_store() {
        let store = Arc::new(MemoryStore::default());
        let resolver = TrendResolver::new()
            .with_source(Arc::new(FixedSource(Ok(Some(vec![10.0])))))
            .with_store(store.clone());

        let first = resolver.resolve("onix").await;
        assert!(store.entries.lock().await.contains_key("onix"));

        let second = resolver.resolve("onix").await;
        assert_eq!(first, second);
        assert_eq!(store.loads.load(Ordering::SeqCst), 2);
    }
}
