use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Metric identity & display metadata
// ---------------------------------------------------------------------------

/// Unique metric identifier, used as key in the catalog, in series points and in requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetricId(pub String);

impl MetricId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// How the value is displayed (and rounded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    Currency,
    Number,
    Percentage,
}

impl MetricUnit {
    pub fn is_currency(&self) -> bool {
        matches!(self, MetricUnit::Currency)
    }
}

/// Direction of the trend badge shown next to the headline value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

/// How a chart window collapses into one headline value.
///
/// `Sum` metrics are flows (volume, new customers) and show the window total.
/// `Last` metrics are levels or ratios (MRR, churn rate) and show the latest point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Last,
}

/// Static metadata describing one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub id: MetricId,
    pub title: String,
    pub unit: MetricUnit,
    /// Current-day value, the level the generated history converges to.
    pub base_value: f64,
    /// Headline trend, in percent.
    pub trend_value: f64,
    pub trend_direction: TrendDirection,
    pub higher_is_better: bool,
    pub aggregation: Aggregation,
}

impl MetricDefinition {
    pub fn is_currency(&self) -> bool {
        self.unit.is_currency()
    }
}

// ---------------------------------------------------------------------------
// Metric sets
// ---------------------------------------------------------------------------

/// Unique set identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricSetId(pub String);

impl MetricSetId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A group of metrics rendered together on one dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSetMeta {
    pub id: MetricSetId,
    pub label: String,
    pub metrics: Vec<MetricId>,
}

// ---------------------------------------------------------------------------
// Period & interval
// ---------------------------------------------------------------------------

/// Requested lookback window.
///
/// Any key that is not recognised deserializes to [`Period::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Period {
    Last7Days,
    Last30Days,
    Last90Days,
    ThisYear,
    Default,
}

impl Period {
    pub fn key(&self) -> &'static str {
        match self {
            Period::Last7Days => "last7days",
            Period::Last30Days => "last30days",
            Period::Last90Days => "last90days",
            Period::ThisYear => "thisYear",
            Period::Default => "default",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "last7days" => Period::Last7Days,
            "last30days" => Period::Last30Days,
            "last90days" => Period::Last90Days,
            "thisYear" => Period::ThisYear,
            _ => Period::Default,
        }
    }
}

impl From<String> for Period {
    fn from(s: String) -> Self {
        Period::from_key(&s)
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.key().to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Granularity of points inside the window; selects the series tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    pub fn key(&self) -> &'static str {
        match self {
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "daily" => Some(Interval::Daily),
            "weekly" => Some(Interval::Weekly),
            "monthly" => Some(Interval::Monthly),
            _ => None,
        }
    }

    pub fn all() -> [Interval; 3] {
        [Interval::Daily, Interval::Weekly, Interval::Monthly]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

// ---------------------------------------------------------------------------
// Series & chart data
// ---------------------------------------------------------------------------

/// One bucket of a series tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// First day covered by the bucket.
    pub timestamp: NaiveDate,
    pub label: String,
    pub metrics: BTreeMap<String, f64>,
}

impl TimeSeriesPoint {
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).copied()
    }
}

/// Parallel arrays ready for a line chart.
///
/// `labels`, `current_data` and `previous_data` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataResult {
    pub labels: Vec<String>,
    pub current_data: Vec<f64>,
    /// `None` means no comparison data exists for that position.
    pub previous_data: Vec<Option<f64>>,
    pub metric_name: String,
}

impl ChartDataResult {
    pub fn len(&self) -> usize {
        self.current_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_data.is_empty()
    }

    /// Previous-period values with gaps drawn as zero.
    pub fn previous_for_chart(&self) -> Vec<f64> {
        self.previous_data.iter().map(|v| v.unwrap_or(0.0)).collect()
    }
}

// ---------------------------------------------------------------------------
// Trend summary
// ---------------------------------------------------------------------------

/// Visual status of the trend badge (drives colour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricStatus {
    Good,
    Bad,
    Neutral,
}

/// Headline numbers derived from one chart: window value vs comparison window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTrend {
    pub id: MetricId,
    pub value: f64,
    /// `None` when the comparison window has no data at all.
    pub previous_value: Option<f64>,
    /// Change relative to the previous window, in percent.
    pub change_percent: Option<f64>,
    pub status: MetricStatus,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Chart request for a single metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataRequest {
    pub metric: MetricId,
    pub period: Period,
    pub interval: Interval,
}
