use contracts::dashboards::d400_billing_overview::{
    BillingOverviewRequest, BillingOverviewResponse, MetricPanel,
};
use contracts::shared::metrics::{ChartDataRequest, MetricUnit};

use crate::shared::format::format_value;
use crate::shared::metrics::catalog::MetricCatalog;
use crate::shared::metrics::resolver::WindowResolver;
use crate::shared::metrics::store::SeriesStore;
use crate::shared::metrics::trend::summarize;

/// Build every chart card of one metric set for the requested window.
pub fn get_billing_overview(
    store: &SeriesStore,
    catalog: &MetricCatalog,
    request: &BillingOverviewRequest,
) -> BillingOverviewResponse {
    let Some(set) = catalog.set(&request.set_id.0) else {
        tracing::warn!("metric set {} not found in catalog", request.set_id.0);
        return BillingOverviewResponse {
            label: request.set_id.0.clone(),
            period: request.period,
            interval: request.interval,
            panels: Vec::new(),
        };
    };

    tracing::info!(
        "Billing overview: {} metrics of {} for {}/{}",
        set.metrics.len(),
        set.id.0,
        request.period,
        request.interval,
    );

    let resolver = WindowResolver::new(store, catalog);
    let panels = set
        .metrics
        .iter()
        .map(|id| {
            let outcome = resolver.resolve_request(&ChartDataRequest {
                metric: id.clone(),
                period: request.period,
                interval: request.interval,
            });
            let synthetic = outcome.is_fallback();
            let chart = outcome.into_chart();
            let trend = summarize(catalog, id.as_str(), &chart);
            let unit = catalog.get(id.as_str()).map_or(MetricUnit::Number, |d| d.unit);

            MetricPanel {
                metric: id.clone(),
                display_value: format_value(trend.value, unit),
                chart,
                trend,
                synthetic,
            }
        })
        .collect();

    BillingOverviewResponse {
        label: set.label.clone(),
        period: request.period,
        interval: request.interval,
        panels,
    }
}
