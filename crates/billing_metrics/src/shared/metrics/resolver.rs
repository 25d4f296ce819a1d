use contracts::shared::metrics::{ChartDataRequest, ChartDataResult, Interval, Period};
use thiserror::Error;

use super::catalog::MetricCatalog;
use super::comparison::previous_window;
use super::dummy::DummyGenerator;
use super::store::SeriesStore;

/// Window used for periods the resolver does not recognise.
pub const DEFAULT_WINDOW: usize = 7;

/// Why a window could not be served from the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("metric `{0}` is not in the catalog")]
    UnknownMetric(String),
    #[error("no {interval} data for `{metric}` in the {period} window")]
    EmptyWindow {
        metric: String,
        period: Period,
        interval: Interval,
    },
}

/// Result of resolving a window: either real series data or the synthetic
/// stand-in, tagged so callers can tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOutcome {
    Resolved(ChartDataResult),
    Fallback {
        reason: ResolveError,
        chart: ChartDataResult,
    },
}

impl WindowOutcome {
    pub fn chart(&self) -> &ChartDataResult {
        match self {
            WindowOutcome::Resolved(chart) => chart,
            WindowOutcome::Fallback { chart, .. } => chart,
        }
    }

    pub fn into_chart(self) -> ChartDataResult {
        match self {
            WindowOutcome::Resolved(chart) => chart,
            WindowOutcome::Fallback { chart, .. } => chart,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, WindowOutcome::Fallback { .. })
    }
}

/// Number of trailing points `period` covers on the `interval` tier;
/// `None` means the whole tier.
pub fn window_len(period: Period, interval: Interval) -> Option<usize> {
    match (period, interval) {
        (Period::Last7Days, Interval::Daily) => Some(7),
        (Period::Last7Days, _) => Some(1),
        (Period::Last30Days, Interval::Daily) => Some(30),
        (Period::Last30Days, Interval::Weekly) => Some(4),
        (Period::Last30Days, Interval::Monthly) => Some(1),
        (Period::Last90Days, Interval::Daily) => Some(90),
        (Period::Last90Days, Interval::Weekly) => Some(13),
        (Period::Last90Days, Interval::Monthly) => Some(3),
        // Only twelve months of history exist, so "this year" is everything.
        (Period::ThisYear, _) => None,
        (Period::Default, _) => Some(DEFAULT_WINDOW),
    }
}

/// Index of the first point of the window in a tier of `len` points.
pub fn window_start(period: Period, interval: Interval, len: usize) -> usize {
    window_len(period, interval).map_or(0, |n| len.saturating_sub(n))
}

/// Serves chart windows from a [`SeriesStore`].
///
/// Holds only shared references, so one resolver can serve any number of
/// requests, from any thread.
pub struct WindowResolver<'a> {
    store: &'a SeriesStore,
    catalog: &'a MetricCatalog,
}

impl<'a> WindowResolver<'a> {
    pub fn new(store: &'a SeriesStore, catalog: &'a MetricCatalog) -> Self {
        Self { store, catalog }
    }

    /// Slices the window out of the store without any fallback.
    pub fn try_resolve(
        &self,
        metric: &str,
        period: Period,
        interval: Interval,
    ) -> Result<ChartDataResult, ResolveError> {
        let definition = self
            .catalog
            .get(metric)
            .ok_or_else(|| ResolveError::UnknownMetric(metric.to_string()))?;

        let tier = self.store.tier(interval);
        let start = window_start(period, interval, tier.len());
        let column: Vec<Option<f64>> = tier.iter().map(|p| p.value(metric)).collect();
        let previous = previous_window(&column, start, tier.len() - start);

        let mut labels = Vec::new();
        let mut current_data = Vec::new();
        let mut previous_data = Vec::new();
        for ((point, value), prev) in tier[start..].iter().zip(&column[start..]).zip(previous) {
            // Points without the metric are dropped together with their comparison value.
            if let Some(value) = value {
                labels.push(point.label.clone());
                current_data.push(*value);
                previous_data.push(prev);
            }
        }

        if current_data.is_empty() {
            return Err(ResolveError::EmptyWindow {
                metric: metric.to_string(),
                period,
                interval,
            });
        }

        Ok(ChartDataResult {
            labels,
            current_data,
            previous_data,
            metric_name: definition.title.clone(),
        })
    }

    /// Resolves the window, substituting synthetic data when the store cannot serve it.
    pub fn resolve(&self, metric: &str, period: Period, interval: Interval) -> WindowOutcome {
        match self.try_resolve(metric, period, interval) {
            Ok(chart) => {
                tracing::debug!(
                    "Resolved {} {}/{}: {} points",
                    metric,
                    period,
                    interval,
                    chart.len()
                );
                WindowOutcome::Resolved(chart)
            }
            Err(reason) => {
                tracing::warn!(
                    metric,
                    %period,
                    %interval,
                    %reason,
                    "falling back to synthetic chart data"
                );
                let chart = DummyGenerator::new(self.catalog, self.store.as_of())
                    .with_hero_metric(self.store.hero_metric())
                    .generate(metric, period, interval);
                WindowOutcome::Fallback { reason, chart }
            }
        }
    }

    /// [`WindowResolver::resolve`] for a request coming from the dashboard.
    pub fn resolve_request(&self, request: &ChartDataRequest) -> WindowOutcome {
        self.resolve(request.metric.as_str(), request.period, request.interval)
    }

    /// Always returns a renderable chart.
    pub fn resolve_window(&self, metric: &str, period: Period, interval: Interval) -> ChartDataResult {
        self.resolve(metric, period, interval).into_chart()
    }
}

/// Shorthand for a one-off [`WindowResolver::resolve_window`].
pub fn resolve_window(
    store: &SeriesStore,
    catalog: &MetricCatalog,
    metric: &str,
    period: Period,
    interval: Interval,
) -> ChartDataResult {
    WindowResolver::new(store, catalog).resolve_window(metric, period, interval)
}
