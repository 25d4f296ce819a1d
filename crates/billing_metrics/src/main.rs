use billing_metrics::dashboards::d400_billing_overview::service::get_billing_overview;
use billing_metrics::shared::config;
use billing_metrics::shared::metrics::catalog::default_catalog;
use billing_metrics::shared::metrics::store::SeriesStore;
use contracts::dashboards::d400_billing_overview::BillingOverviewRequest;
use contracts::shared::metrics::{Interval, MetricSetId, Period};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Log directory next to the build output
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("billing_metrics.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = config::load_config()?;
    let catalog = default_catalog();
    let options = config.generator_options();

    let store = match config.generator.seed {
        Some(seed) => {
            tracing::info!("Generating series with fixed seed {}", seed);
            SeriesStore::build(catalog, &options, &mut StdRng::seed_from_u64(seed))
        }
        None => SeriesStore::build(catalog, &options, &mut rand::thread_rng()),
    };

    // Optional overrides: billing_metrics [set] [period] [interval]
    let mut args = std::env::args().skip(1);
    let set = args.next().unwrap_or_else(|| config.demo.set.clone());
    let period = args
        .next()
        .map(|p| Period::from_key(&p))
        .unwrap_or(config.demo.period);
    let interval = match args.next() {
        Some(key) => Interval::from_key(&key)
            .ok_or_else(|| anyhow::anyhow!("unknown interval `{key}` (daily, weekly, monthly)"))?,
        None => config.demo.interval,
    };

    let request = BillingOverviewRequest {
        set_id: MetricSetId::new(&set),
        period,
        interval,
    };
    let response = get_billing_overview(&store, catalog, &request);

    for panel in &response.panels {
        tracing::info!(
            "{:<18} {:>14}  change {:>8}{}",
            panel.metric,
            panel.display_value,
            panel
                .trend
                .change_percent
                .map_or_else(|| "n/a".to_string(), |c| format!("{c:+.2}%")),
            if panel.synthetic { "  (synthetic)" } else { "" },
        );
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
