//! Builds the three series tiers.
//!
//! Monthly values come from a growth model seeded at ~51% of each metric's
//! current value. Weekly values split each month into 4 buckets and daily
//! values split each week into 7, each with a little jitter, so coarser tiers
//! stay roughly consistent with finer ones without summing exactly.

use chrono::{Datelike, Duration, Months, NaiveDate};
use contracts::shared::metrics::{Interval, MetricDefinition, MetricUnit, TimeSeriesPoint};
use rand::Rng;
use std::collections::BTreeMap;

use super::anomaly::AnomalySchedule;
use super::catalog::{ids, MetricCatalog};
use crate::shared::format::{label_for, round_for_unit};

pub const HISTORY_MONTHS: usize = 12;
pub const WEEKS_PER_MONTH: usize = 4;
pub const DAYS_PER_WEEK: usize = 7;

/// Share of the current value a growth metric starts from, twelve months back.
const SEED_RATIO: f64 = 0.51;
/// Width of the random band around the monthly growth rate.
const GROWTH_VARIANCE: f64 = 0.02;
/// Rates that improve over time start this far above their floor.
const IMPROVING_START_RATIO: f64 = 1.5;
/// Fraction of the distance to the floor kept each month.
const DECAY: f64 = 0.7;
const DECAY_VARIANCE: f64 = 0.1;

const GROSS_VOLUME_PER_MRR: f64 = 2.4;
const OVERAGE_SHARE_OF_MRR: f64 = 0.568;

pub const WEEKLY_JITTER: f64 = 0.03;
pub const DAILY_JITTER: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Last day covered by the generated history.
    pub as_of: NaiveDate,
    pub anomaly: Option<AnomalySchedule>,
}

#[derive(Debug, Clone)]
pub struct GeneratedTiers {
    pub monthly: Vec<TimeSeriesPoint>,
    pub weekly: Vec<TimeSeriesPoint>,
    pub daily: Vec<TimeSeriesPoint>,
}

/// How a metric's monthly value is produced.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SeriesModel {
    Growth,
    Improving,
    Derived(Derivation),
}

/// Metrics computed from other metrics of the same month with fixed ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Derivation {
    GrossVolume,
    NetVolume,
    OverageRevenue,
    Arpu,
}

impl Derivation {
    /// Evaluation order; later entries may read earlier ones.
    const ORDER: [Derivation; 4] = [
        Derivation::GrossVolume,
        Derivation::NetVolume,
        Derivation::OverageRevenue,
        Derivation::Arpu,
    ];

    fn for_metric(id: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|d| d.metric() == id)
    }

    fn metric(&self) -> String {
        match self {
            Derivation::GrossVolume => ids::gross_volume().0,
            Derivation::NetVolume => ids::net_volume().0,
            Derivation::OverageRevenue => ids::overage_revenue().0,
            Derivation::Arpu => ids::arpu().0,
        }
    }

    fn inputs(&self) -> Vec<String> {
        match self {
            Derivation::GrossVolume => vec![ids::mrr().0],
            Derivation::NetVolume => vec![ids::gross_volume().0, ids::refund_rate().0],
            Derivation::OverageRevenue => vec![ids::mrr().0],
            Derivation::Arpu => vec![ids::mrr().0, ids::active_subscribers().0],
        }
    }

    fn apply(&self, month: &BTreeMap<String, f64>) -> f64 {
        let get = |id: String| month.get(&id).copied().unwrap_or(0.0);
        match self {
            Derivation::GrossVolume => get(ids::mrr().0) * GROSS_VOLUME_PER_MRR,
            Derivation::NetVolume => {
                let gross = get(ids::gross_volume().0);
                gross - gross * get(ids::refund_rate().0) / 100.0
            }
            Derivation::OverageRevenue => get(ids::mrr().0) * OVERAGE_SHARE_OF_MRR,
            Derivation::Arpu => {
                let subscribers = get(ids::active_subscribers().0);
                if subscribers > 0.0 {
                    get(ids::mrr().0) / subscribers
                } else {
                    0.0
                }
            }
        }
    }
}

impl SeriesModel {
    fn for_metric(def: &MetricDefinition, catalog: &MetricCatalog) -> Self {
        if let Some(derivation) = Derivation::for_metric(def.id.as_str()) {
            if derivation.inputs().iter().all(|i| catalog.contains(i)) {
                return SeriesModel::Derived(derivation);
            }
        }
        if def.unit == MetricUnit::Percentage && !def.higher_is_better {
            SeriesModel::Improving
        } else {
            SeriesModel::Growth
        }
    }
}

/// Generates all three tiers for every metric of the catalog.
pub fn generate_tiers<R: Rng>(
    catalog: &MetricCatalog,
    options: &GeneratorOptions,
    rng: &mut R,
) -> GeneratedTiers {
    let anomaly = options.anomaly.as_ref();

    let monthly = generate_monthly(catalog, options, rng);

    let weeks = HISTORY_MONTHS * WEEKS_PER_MONTH;
    let weekly = split_tier(
        catalog,
        &monthly,
        WEEKS_PER_MONTH,
        WEEKLY_JITTER,
        Interval::Weekly,
        trailing_dates(options.as_of - Duration::days(6), weeks, 7),
        |metric, month, week| {
            anomaly
                .filter(|a| a.applies_to(metric))
                .and_then(|a| a.weekly_multiplier(month, HISTORY_MONTHS, week, WEEKS_PER_MONTH))
        },
        rng,
    );

    let daily = split_tier(
        catalog,
        &weekly,
        DAYS_PER_WEEK,
        DAILY_JITTER,
        Interval::Daily,
        trailing_dates(options.as_of, weeks * DAYS_PER_WEEK, 1),
        |metric, week, day| {
            anomaly
                .filter(|a| a.applies_to(metric))
                .and_then(|a| a.daily_multiplier(week, weeks, day, DAYS_PER_WEEK))
        },
        rng,
    );

    GeneratedTiers {
        monthly,
        weekly,
        daily,
    }
}

fn generate_monthly<R: Rng>(
    catalog: &MetricCatalog,
    options: &GeneratorOptions,
    rng: &mut R,
) -> Vec<TimeSeriesPoint> {
    let models: Vec<(&MetricDefinition, SeriesModel)> = catalog
        .metrics()
        .iter()
        .map(|def| (def, SeriesModel::for_metric(def, catalog)))
        .collect();

    // Compound rate that takes SEED_RATIO back to 1.0 over the history.
    let growth = (1.0 / SEED_RATIO).powf(1.0 / (HISTORY_MONTHS - 1) as f64) - 1.0;

    let mut previous: BTreeMap<String, f64> = BTreeMap::new();
    let mut points = Vec::with_capacity(HISTORY_MONTHS);

    for (month, timestamp) in trailing_months(options.as_of, HISTORY_MONTHS)
        .into_iter()
        .enumerate()
    {
        let mut raw: BTreeMap<String, f64> = BTreeMap::new();

        for (def, model) in &models {
            let prev = previous.get(def.id.as_str()).copied();
            let value = match model {
                SeriesModel::Growth => match prev {
                    None => def.base_value * SEED_RATIO,
                    Some(prev) => {
                        let rate = growth + (rng.gen::<f64>() - 0.5) * GROWTH_VARIANCE;
                        prev * (1.0 + rate)
                    }
                },
                SeriesModel::Improving => match prev {
                    None => def.base_value * IMPROVING_START_RATIO,
                    Some(prev) => {
                        let decay = DECAY * (1.0 + (rng.gen::<f64>() - 0.5) * DECAY_VARIANCE);
                        let next = def.base_value + (prev - def.base_value) * decay;
                        next.min(prev).max(def.base_value)
                    }
                },
                SeriesModel::Derived(_) => continue,
            };
            raw.insert(def.id.0.clone(), value);
        }

        for derivation in Derivation::ORDER {
            let derived = models
                .iter()
                .any(|(_, model)| *model == SeriesModel::Derived(derivation));
            if derived {
                let value = derivation.apply(&raw);
                raw.insert(derivation.metric(), value);
            }
        }

        let metrics = raw
            .iter()
            .map(|(key, &value)| {
                let scripted = options
                    .anomaly
                    .as_ref()
                    .filter(|a| a.applies_to(key))
                    .and_then(|a| a.monthly_multiplier(month, HISTORY_MONTHS))
                    .unwrap_or(1.0);
                let unit = catalog.get(key).map_or(MetricUnit::Currency, |d| d.unit);
                (key.clone(), round_for_unit(value * scripted, unit))
            })
            .collect();

        points.push(TimeSeriesPoint {
            timestamp,
            label: label_for(Interval::Monthly, timestamp),
            metrics,
        });

        // Spikes are applied on output only, growth continues from the model.
        previous = raw;
    }

    points
}

/// Splits every parent bucket into `parts` child buckets.
///
/// Every metric gets an equal share of its parent value times jitter.
/// `scripted(metric, parent_index, part)` returns a fixed multiplier that
/// replaces jitter for that child value.
#[allow(clippy::too_many_arguments)]
fn split_tier<R, F>(
    catalog: &MetricCatalog,
    parents: &[TimeSeriesPoint],
    parts: usize,
    jitter_amplitude: f64,
    interval: Interval,
    dates: Vec<NaiveDate>,
    scripted: F,
    rng: &mut R,
) -> Vec<TimeSeriesPoint>
where
    R: Rng,
    F: Fn(&str, usize, usize) -> Option<f64>,
{
    let mut dates = dates.into_iter();
    let mut points = Vec::with_capacity(parents.len() * parts);

    for (parent_index, parent) in parents.iter().enumerate() {
        for part in 0..parts {
            let timestamp = dates.next().unwrap_or(parent.timestamp);
            let mut metrics = BTreeMap::new();

            for (key, &parent_value) in &parent.metrics {
                let unit = catalog.get(key).map_or(MetricUnit::Currency, |d| d.unit);
                let share = parent_value / parts as f64;
                let factor = match scripted(key.as_str(), parent_index, part) {
                    Some(multiplier) => multiplier,
                    None => jitter(rng, jitter_amplitude),
                };
                metrics.insert(key.clone(), round_for_unit(share * factor, unit));
            }

            points.push(TimeSeriesPoint {
                timestamp,
                label: label_for(interval, timestamp),
                metrics,
            });
        }
    }

    points
}

/// A factor uniformly drawn from `1 ± amplitude`.
fn jitter<R: Rng>(rng: &mut R, amplitude: f64) -> f64 {
    1.0 + (rng.gen::<f64>() * 2.0 - 1.0) * amplitude
}

/// First days of the `count` calendar months ending with the month of `as_of`.
pub fn trailing_months(as_of: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let month_start = as_of - Duration::days(i64::from(as_of.day()) - 1);
    (0..count)
        .rev()
        .map(|back| {
            month_start
                .checked_sub_months(Months::new(back as u32))
                .unwrap_or(month_start)
        })
        .collect()
}

/// `count` dates spaced `step_days` apart, the last one being `end`.
pub fn trailing_dates(end: NaiveDate, count: usize, step_days: i64) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .map(|back| end - Duration::days(back as i64 * step_days))
        .collect()
}
