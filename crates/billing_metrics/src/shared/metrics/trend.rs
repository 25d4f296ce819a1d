use contracts::shared::metrics::*;

use super::catalog::MetricCatalog;
use crate::shared::format::round2;

/// Percentage change beyond which the badge turns good or bad.
const STATUS_THRESHOLD: f64 = 5.0;

/// Headline value of the current window against the comparison window.
///
/// Flow metrics are summed over the window, levels use the latest point.
/// A flow total has no previous value unless the whole comparison window exists.
pub fn summarize(catalog: &MetricCatalog, metric: &str, chart: &ChartDataResult) -> MetricTrend {
    let (aggregation, higher_is_better) = catalog
        .get(metric)
        .map_or((Aggregation::Last, true), |d| (d.aggregation, d.higher_is_better));

    let (value, previous_value) = match aggregation {
        Aggregation::Sum => {
            // A padded comparison window covers fewer points, so its total is not comparable.
            let previous: Option<Vec<f64>> = chart.previous_data.iter().copied().collect();
            (
                chart.current_data.iter().sum::<f64>(),
                previous
                    .filter(|p| !p.is_empty())
                    .map(|p| p.iter().sum::<f64>()),
            )
        }
        Aggregation::Last => (
            chart.current_data.last().copied().unwrap_or(0.0),
            chart.previous_data.last().copied().flatten(),
        ),
    };

    let change = previous_value.and_then(|prev| pct_change(value, prev));

    MetricTrend {
        id: MetricId::new(metric),
        value: round2(value),
        previous_value: previous_value.map(round2),
        change_percent: change.map(round2),
        status: status_by_change(change, higher_is_better),
    }
}

fn pct_change(cur: f64, prev: f64) -> Option<f64> {
    if prev.abs() < 0.01 {
        None
    } else {
        Some(((cur - prev) / prev.abs()) * 100.0)
    }
}

fn status_by_change(change: Option<f64>, higher_is_good: bool) -> MetricStatus {
    match change {
        Some(c) if c > STATUS_THRESHOLD => {
            if higher_is_good {
                MetricStatus::Good
            } else {
                MetricStatus::Bad
            }
        }
        Some(c) if c < -STATUS_THRESHOLD => {
            if higher_is_good {
                MetricStatus::Bad
            } else {
                MetricStatus::Good
            }
        }
        _ => MetricStatus::Neutral,
    }
}
