use contracts::shared::metrics::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Well-known metric IDs (constants to avoid typos).
pub mod ids {
    use contracts::shared::metrics::MetricId;

    pub fn gross_volume() -> MetricId {
        MetricId::new("grossvolume")
    }
    pub fn net_volume() -> MetricId {
        MetricId::new("netvolume")
    }
    pub fn mrr() -> MetricId {
        MetricId::new("mrr")
    }
    pub fn overage_revenue() -> MetricId {
        MetricId::new("overagerevenue")
    }
    pub fn new_customers() -> MetricId {
        MetricId::new("newcustomers")
    }
    pub fn active_subscribers() -> MetricId {
        MetricId::new("activesubscribers")
    }
    pub fn arpu() -> MetricId {
        MetricId::new("arpu")
    }
    pub fn churn_rate() -> MetricId {
        MetricId::new("churnrate")
    }
    pub fn refund_rate() -> MetricId {
        MetricId::new("refundrate")
    }
}

/// Well-known metric set IDs.
pub mod set_ids {
    use contracts::shared::metrics::MetricSetId;

    pub fn billing_overview() -> MetricSetId {
        MetricSetId::new("billing_overview")
    }
    pub fn customers() -> MetricSetId {
        MetricSetId::new("customers")
    }
    pub fn payments_health() -> MetricSetId {
        MetricSetId::new("payments_health")
    }
}

/// Read-only registry of metric definitions and the sets that group them.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    metrics: Vec<MetricDefinition>,
    index: HashMap<String, usize>,
    sets: Vec<MetricSetMeta>,
}

impl MetricCatalog {
    pub fn new(metrics: Vec<MetricDefinition>, sets: Vec<MetricSetMeta>) -> Self {
        let index = metrics
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.0.clone(), i))
            .collect();
        Self {
            metrics,
            index,
            sets,
        }
    }

    /// Looks up a metric; `None` for ids the catalog does not know.
    pub fn get(&self, id: &str) -> Option<&MetricDefinition> {
        self.index.get(id).map(|&i| &self.metrics[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All definitions, in catalog order.
    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub fn sets(&self) -> &[MetricSetMeta] {
        &self.sets
    }

    pub fn set(&self, id: &str) -> Option<&MetricSetMeta> {
        self.sets.iter().find(|s| s.id.0 == id)
    }
}

/// Build the built-in catalogue of billing metrics + sets.
pub fn build_catalog() -> MetricCatalog {
    let metrics = vec![
        MetricDefinition {
            id: ids::gross_volume(),
            title: "Gross volume".into(),
            unit: MetricUnit::Currency,
            base_value: 115_800.00,
            trend_value: 9.8,
            trend_direction: TrendDirection::Up,
            higher_is_better: true,
            aggregation: Aggregation::Sum,
        },
        MetricDefinition {
            id: ids::net_volume(),
            title: "Net volume".into(),
            unit: MetricUnit::Currency,
            base_value: 114_410.40,
            trend_value: 8.9,
            trend_direction: TrendDirection::Up,
            higher_is_better: true,
            aggregation: Aggregation::Sum,
        },
        MetricDefinition {
            id: ids::mrr(),
            title: "MRR".into(),
            unit: MetricUnit::Currency,
            base_value: 48_250.00,
            trend_value: 12.4,
            trend_direction: TrendDirection::Up,
            higher_is_better: true,
            aggregation: Aggregation::Last,
        },
        MetricDefinition {
            id: ids::overage_revenue(),
            title: "Overage revenue".into(),
            unit: MetricUnit::Currency,
            base_value: 27_410.00,
            trend_value: 38.2,
            trend_direction: TrendDirection::Up,
            higher_is_better: true,
            aggregation: Aggregation::Sum,
        },
        MetricDefinition {
            id: ids::new_customers(),
            title: "New customers".into(),
            unit: MetricUnit::Number,
            base_value: 184.0,
            trend_value: 6.1,
            trend_direction: TrendDirection::Up,
            higher_is_better: true,
            aggregation: Aggregation::Sum,
        },
        MetricDefinition {
            id: ids::active_subscribers(),
            title: "Active subscribers".into(),
            unit: MetricUnit::Number,
            base_value: 2_412.0,
            trend_value: 4.3,
            trend_direction: TrendDirection::Up,
            higher_is_better: true,
            aggregation: Aggregation::Last,
        },
        MetricDefinition {
            id: ids::arpu(),
            title: "Average revenue per user".into(),
            unit: MetricUnit::Currency,
            base_value: 20.00,
            trend_value: 2.1,
            trend_direction: TrendDirection::Up,
            higher_is_better: true,
            aggregation: Aggregation::Last,
        },
        MetricDefinition {
            id: ids::churn_rate(),
            title: "Churn rate".into(),
            unit: MetricUnit::Percentage,
            base_value: 2.8,
            trend_value: 0.4,
            trend_direction: TrendDirection::Down,
            higher_is_better: false,
            aggregation: Aggregation::Last,
        },
        MetricDefinition {
            id: ids::refund_rate(),
            title: "Refund rate".into(),
            unit: MetricUnit::Percentage,
            base_value: 1.2,
            trend_value: 0.2,
            trend_direction: TrendDirection::Down,
            higher_is_better: false,
            aggregation: Aggregation::Last,
        },
    ];

    let sets = vec![
        MetricSetMeta {
            id: set_ids::billing_overview(),
            label: "Billing overview".into(),
            metrics: vec![
                ids::gross_volume(),
                ids::net_volume(),
                ids::mrr(),
                ids::overage_revenue(),
            ],
        },
        MetricSetMeta {
            id: set_ids::customers(),
            label: "Customers".into(),
            metrics: vec![
                ids::new_customers(),
                ids::active_subscribers(),
                ids::arpu(),
                ids::churn_rate(),
            ],
        },
        MetricSetMeta {
            id: set_ids::payments_health(),
            label: "Payments health".into(),
            metrics: vec![ids::refund_rate(), ids::churn_rate(), ids::net_volume()],
        },
    ];

    MetricCatalog::new(metrics, sets)
}

static DEFAULT_CATALOG: Lazy<MetricCatalog> = Lazy::new(build_catalog);

/// The built-in catalogue, built on first use.
pub fn default_catalog() -> &'static MetricCatalog {
    &DEFAULT_CATALOG
}

/// Looks up a metric in the built-in catalogue.
pub fn get_metric_definition(id: &str) -> Option<&'static MetricDefinition> {
    default_catalog().get(id)
}
