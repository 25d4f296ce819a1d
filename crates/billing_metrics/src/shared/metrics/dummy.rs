//! Synthetic chart data used when the store has nothing to show.
//!
//! The dashboard never renders an empty chart: any request that cannot be
//! served from the series store is answered with a plausible made-up series
//! instead. Results are seeded from the request itself, so the same request
//! always gets the same answer.

use chrono::{Duration, NaiveDate};
use contracts::shared::metrics::{ChartDataResult, Interval, MetricUnit, Period};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::catalog::MetricCatalog;
use super::generator::{trailing_dates, trailing_months};
use super::resolver::window_len;
use crate::shared::format::{label_for, round2, round_for_unit};

/// Hero metric values for a 7-point window, as shown in product screenshots.
pub const HERO_PATTERN: [f64; 7] = [962.31, 962.38, 961.70, 970.60, 969.99, 1151.13, 1342.99];
pub const HERO_PREVIOUS_PATTERN: [f64; 7] =
    [776.37, 792.60, 780.42, 783.22, 787.45, 866.77, 945.57];

const HERO_START: f64 = 962.31;
const HERO_GROWTH_PER_POINT: f64 = 0.002;
const HERO_SPIKE: [f64; 2] = [1.19, 1.39];
const HERO_PREVIOUS_RATIO: f64 = 0.81;
const HERO_SPIKE_PREVIOUS_RATIO: f64 = 0.73;

const GENERIC_BASE_VALUE: f64 = 1000.0;
const DUMMY_JITTER: f64 = 0.05;
const DUMMY_TREND_PER_POINT: f64 = 0.01;
const PREVIOUS_RATIO: f64 = 0.9;

pub struct DummyGenerator<'a> {
    catalog: &'a MetricCatalog,
    as_of: NaiveDate,
    hero_metric: Option<&'a str>,
}

impl<'a> DummyGenerator<'a> {
    pub fn new(catalog: &'a MetricCatalog, as_of: NaiveDate) -> Self {
        Self {
            catalog,
            as_of,
            hero_metric: None,
        }
    }

    pub fn with_hero_metric(mut self, metric: Option<&'a str>) -> Self {
        self.hero_metric = metric;
        self
    }

    /// Always returns a complete chart with no gaps.
    pub fn generate(&self, metric: &str, period: Period, interval: Interval) -> ChartDataResult {
        let count = point_count(period, interval);

        let (current_data, previous) = if self.hero_metric == Some(metric) {
            hero_series(count)
        } else {
            self.synthetic_series(metric, period, interval, count)
        };

        ChartDataResult {
            labels: labels(self.as_of, interval, count),
            current_data,
            previous_data: previous.into_iter().map(Some).collect(),
            metric_name: self
                .catalog
                .get(metric)
                .map_or_else(|| metric.to_string(), |d| d.title.clone()),
        }
    }

    /// `base * (1 ± 5%) * (1 + 1% * i)`, previous period at 90% of current.
    fn synthetic_series(
        &self,
        metric: &str,
        period: Period,
        interval: Interval,
        count: usize,
    ) -> (Vec<f64>, Vec<f64>) {
        let (base, unit) = self
            .catalog
            .get(metric)
            .map_or((GENERIC_BASE_VALUE, MetricUnit::Currency), |d| {
                (d.base_value, d.unit)
            });
        let mut rng = StdRng::seed_from_u64(request_seed(metric, period, interval));

        let current: Vec<f64> = (0..count)
            .map(|i| {
                let noise = 1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * DUMMY_JITTER;
                let trend = 1.0 + DUMMY_TREND_PER_POINT * i as f64;
                round_for_unit(base * noise * trend, unit)
            })
            .collect();
        let previous = current
            .iter()
            .map(|v| round_for_unit(v * PREVIOUS_RATIO, unit))
            .collect();

        (current, previous)
    }
}

/// Number of points a synthesized window has.
pub fn point_count(period: Period, interval: Interval) -> usize {
    window_len(period, interval).unwrap_or(match interval {
        Interval::Daily => 365,
        Interval::Weekly => 52,
        Interval::Monthly => 12,
    })
}

fn labels(as_of: NaiveDate, interval: Interval, count: usize) -> Vec<String> {
    let dates = match interval {
        Interval::Daily => trailing_dates(as_of, count, 1),
        Interval::Weekly => trailing_dates(as_of - Duration::days(6), count, 7),
        Interval::Monthly => trailing_months(as_of, count),
    };
    dates.into_iter().map(|d| label_for(interval, d)).collect()
}

/// Slow growth ending in a two-point spike.
fn hero_series(count: usize) -> (Vec<f64>, Vec<f64>) {
    if count == HERO_PATTERN.len() {
        return (HERO_PATTERN.to_vec(), HERO_PREVIOUS_PATTERN.to_vec());
    }

    let spike_start = count.saturating_sub(HERO_SPIKE.len());
    let mut current = Vec::with_capacity(count);
    let mut previous = Vec::with_capacity(count);

    for i in 0..count {
        let trend = HERO_START * (1.0 + HERO_GROWTH_PER_POINT * i as f64);
        let (value, previous_ratio) = if i >= spike_start {
            let spike = HERO_SPIKE[HERO_SPIKE.len() - (count - i)];
            (trend * spike, HERO_SPIKE_PREVIOUS_RATIO)
        } else {
            (trend, HERO_PREVIOUS_RATIO)
        };
        current.push(round2(value));
        previous.push(round2(value * previous_ratio));
    }

    (current, previous)
}

/// FNV-1a over the request key.
fn request_seed(metric: &str, period: Period, interval: Interval) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    [metric, period.key(), interval.key()]
        .iter()
        .flat_map(|part| part.bytes().chain(std::iter::once(b'|')))
        .fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::metrics::catalog::build_catalog;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
    }

    #[test]
    fn test_hero_fixed_pattern() {
        let catalog = build_catalog();
        let generator = DummyGenerator::new(&catalog, as_of()).with_hero_metric(Some("overagerevenue"));
        let chart = generator.generate("overagerevenue", Period::Last7Days, Interval::Daily);

        assert_eq!(chart.current_data, HERO_PATTERN.to_vec());
        assert_eq!(
            chart.previous_data,
            HERO_PREVIOUS_PATTERN.iter().copied().map(Some).collect::<Vec<_>>()
        );
        assert_eq!(chart.metric_name, "Overage revenue");
        assert_eq!(
            chart.labels,
            vec!["Mar 25", "Mar 26", "Mar 27", "Mar 28", "Mar 29", "Mar 30", "Mar 31"]
        );
    }

    #[test]
    fn test_hero_curve_for_other_lengths() {
        let catalog = build_catalog();
        let generator = DummyGenerator::new(&catalog, as_of()).with_hero_metric(Some("overagerevenue"));
        let chart = generator.generate("overagerevenue", Period::Last30Days, Interval::Daily);

        assert_eq!(chart.len(), 30);
        let data = &chart.current_data;
        assert!(data[..28].windows(2).all(|w| w[0] < w[1]));
        assert!(data[28] > data[27] * 1.15);
        assert!(data[29] > data[28]);
        for (cur, prev) in data.iter().zip(&chart.previous_data) {
            assert!(prev.unwrap() < *cur);
        }
    }

    #[test]
    fn test_hero_single_point() {
        let (current, previous) = hero_series(1);
        assert_eq!(current, vec![round2(HERO_START * HERO_SPIKE[1])]);
        assert_eq!(previous.len(), 1);
        assert!(hero_series(0).0.is_empty());
    }

    #[test]
    fn test_unknown_metric_gets_generic_series() {
        let catalog = build_catalog();
        let generator = DummyGenerator::new(&catalog, as_of());
        let chart = generator.generate("nonexistent-metric", Period::Last7Days, Interval::Daily);

        assert_eq!(chart.len(), 7);
        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.metric_name, "nonexistent-metric");
        for (i, v) in chart.current_data.iter().enumerate() {
            let trend = 1.0 + DUMMY_TREND_PER_POINT * i as f64;
            assert!(v.is_finite());
            assert!(*v >= GENERIC_BASE_VALUE * 0.95 * trend - 0.01);
            assert!(*v <= GENERIC_BASE_VALUE * 1.05 * trend + 0.01);
        }
        for (cur, prev) in chart.current_data.iter().zip(&chart.previous_data) {
            assert_eq!(prev.unwrap(), round2(cur * PREVIOUS_RATIO));
        }
    }

    #[test]
    fn test_known_metric_uses_base_value_and_unit() {
        let catalog = build_catalog();
        let generator = DummyGenerator::new(&catalog, as_of());
        let chart = generator.generate("newcustomers", Period::Last90Days, Interval::Weekly);

        assert_eq!(chart.len(), 13);
        assert_eq!(chart.metric_name, "New customers");
        assert!(chart.current_data.iter().all(|v| v.fract() == 0.0));
        assert!(chart.current_data[0] >= 174.0 && chart.current_data[0] <= 194.0);
    }

    #[test]
    fn test_same_request_same_series() {
        let catalog = build_catalog();
        let generator = DummyGenerator::new(&catalog, as_of());
        let a = generator.generate("mrr", Period::Last30Days, Interval::Daily);
        let b = generator.generate("mrr", Period::Last30Days, Interval::Daily);
        assert_eq!(a, b);
        let c = generator.generate("mrr", Period::Last30Days, Interval::Weekly);
        assert_ne!(a.current_data[..4], c.current_data[..]);
    }

    #[test]
    fn test_point_counts() {
        assert_eq!(point_count(Period::ThisYear, Interval::Monthly), 12);
        assert_eq!(point_count(Period::ThisYear, Interval::Weekly), 52);
        assert_eq!(point_count(Period::ThisYear, Interval::Daily), 365);
        assert_eq!(point_count(Period::Default, Interval::Monthly), 7);
        assert_eq!(point_count(Period::Last30Days, Interval::Weekly), 4);
    }

    #[test]
    fn test_monthly_labels() {
        let catalog = build_catalog();
        let chart = DummyGenerator::new(&catalog, as_of()).generate(
            "mrr",
            Period::ThisYear,
            Interval::Monthly,
        );
        assert_eq!(chart.labels.first().unwrap(), "Apr 2024");
        assert_eq!(chart.labels.last().unwrap(), "Mar 2025");
    }
}
