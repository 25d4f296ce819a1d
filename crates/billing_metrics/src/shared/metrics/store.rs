use chrono::NaiveDate;
use contracts::shared::metrics::{Interval, TimeSeriesPoint};
use rand::Rng;

use super::catalog::MetricCatalog;
use super::generator::{generate_tiers, GeneratorOptions};

/// Pre-generated series for every tier.
///
/// Built once by the startup routine and shared by reference afterwards;
/// nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    as_of: NaiveDate,
    /// Metric that gets the hand-authored demo curve when synthesized.
    hero_metric: Option<String>,
    monthly: Vec<TimeSeriesPoint>,
    weekly: Vec<TimeSeriesPoint>,
    daily: Vec<TimeSeriesPoint>,
}

impl SeriesStore {
    /// Generates all tiers for `catalog`, drawing randomness from `rng`.
    pub fn build<R: Rng>(catalog: &MetricCatalog, options: &GeneratorOptions, rng: &mut R) -> Self {
        let tiers = generate_tiers(catalog, options, rng);

        tracing::info!(
            "Series store built as of {}: {} monthly, {} weekly, {} daily points for {} metrics",
            options.as_of,
            tiers.monthly.len(),
            tiers.weekly.len(),
            tiers.daily.len(),
            catalog.metrics().len(),
        );

        Self {
            as_of: options.as_of,
            hero_metric: options.anomaly.as_ref().map(|a| a.metric.clone()),
            monthly: tiers.monthly,
            weekly: tiers.weekly,
            daily: tiers.daily,
        }
    }

    /// Wraps already generated tiers.
    pub fn from_tiers(
        as_of: NaiveDate,
        monthly: Vec<TimeSeriesPoint>,
        weekly: Vec<TimeSeriesPoint>,
        daily: Vec<TimeSeriesPoint>,
    ) -> Self {
        Self {
            as_of,
            hero_metric: None,
            monthly,
            weekly,
            daily,
        }
    }

    /// A store without any history; every request falls back to synthetic data.
    pub fn empty(as_of: NaiveDate) -> Self {
        Self::from_tiers(as_of, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn with_hero_metric(mut self, metric: Option<String>) -> Self {
        self.hero_metric = metric;
        self
    }

    pub fn tier(&self, interval: Interval) -> &[TimeSeriesPoint] {
        match interval {
            Interval::Daily => &self.daily,
            Interval::Weekly => &self.weekly,
            Interval::Monthly => &self.monthly,
        }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn hero_metric(&self) -> Option<&str> {
        self.hero_metric.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metrics::anomaly::AnomalySchedule;
    use crate::shared::metrics::catalog::build_catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
    }

    #[test]
    fn test_build_selects_tiers() {
        let options = GeneratorOptions {
            as_of: as_of(),
            anomaly: Some(AnomalySchedule::overage_revenue()),
        };
        let store = SeriesStore::build(&build_catalog(), &options, &mut StdRng::seed_from_u64(1));
        assert_eq!(store.tier(Interval::Monthly).len(), 12);
        assert_eq!(store.tier(Interval::Weekly).len(), 48);
        assert_eq!(store.tier(Interval::Daily).len(), 336);
        assert_eq!(store.as_of(), as_of());
        assert_eq!(store.hero_metric(), Some("overagerevenue"));
    }

    #[test]
    fn test_empty_store() {
        let store = SeriesStore::empty(as_of()).with_hero_metric(Some("mrr".into()));
        for interval in Interval::all() {
            assert!(store.tier(interval).is_empty());
        }
        assert_eq!(store.hero_metric(), Some("mrr"));
    }

    #[test]
    fn test_store_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SeriesStore>();
    }
}
