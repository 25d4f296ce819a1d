use serde::{Deserialize, Serialize};

use crate::shared::metrics::{ChartDataResult, Interval, MetricId, MetricSetId, MetricTrend, Period};

/// Request for the billing overview dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingOverviewRequest {
    /// Metric set to render (e.g., "billing_overview")
    pub set_id: MetricSetId,
    pub period: Period,
    pub interval: Interval,
}

/// Response for the billing overview dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingOverviewResponse {
    /// Label of the rendered set
    pub label: String,
    pub period: Period,
    pub interval: Interval,
    /// One panel per metric, in set order
    pub panels: Vec<MetricPanel>,
}

/// Single chart card on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricPanel {
    pub metric: MetricId,
    /// Headline value formatted for its unit (e.g., "$48,250.00")
    pub display_value: String,
    pub chart: ChartDataResult,
    pub trend: MetricTrend,
    /// True when the chart was synthesized because no series data existed
    pub synthetic: bool,
}
