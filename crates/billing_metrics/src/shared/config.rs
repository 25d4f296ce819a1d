use chrono::{Local, NaiveDate};
use contracts::shared::metrics::{Interval, Period};
use serde::Deserialize;

use crate::shared::metrics::anomaly::AnomalySchedule;
use crate::shared::metrics::generator::GeneratorOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Scripted spike; leave the section out to disable it.
    #[serde(default)]
    pub anomaly: Option<AnomalySchedule>,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeneratorConfig {
    /// Last day of generated history; today when absent.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Fixed seed for reproducible series; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Dashboard rendered by the binary.
#[derive(Debug, Deserialize, Clone)]
pub struct DemoConfig {
    pub set: String,
    pub period: Period,
    pub interval: Interval,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            set: "billing_overview".to_string(),
            period: Period::Last30Days,
            interval: Interval::Daily,
        }
    }
}

impl Config {
    pub fn as_of(&self) -> NaiveDate {
        self.generator
            .as_of
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            as_of: self.as_of(),
            anomaly: self.anomaly.clone(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[generator]
# as_of = "2025-03-31"
# seed = 42

[anomaly]
metric = "overagerevenue"
monthly_tail = [1.2, 1.4]
weekly_tail = [1.15, 1.4]
daily_final_week_tail = [1.2, 1.4]
daily_prior_week_tail = [1.1, 1.2]

[demo]
set = "billing_overview"
period = "last30days"
interval = "daily"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.generator.seed, None);
        assert_eq!(config.anomaly, Some(AnomalySchedule::overage_revenue()));
        assert_eq!(config.demo.set, "billing_overview");
        assert_eq!(config.demo.period, Period::Last30Days);
        assert_eq!(config.demo.interval, Interval::Daily);
    }

    #[test]
    fn test_pinned_generator() {
        let config = parse_config(
            r#"
            [generator]
            as_of = "2025-03-31"
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.as_of(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(config.generator.seed, Some(7));
        assert!(config.anomaly.is_none());
        assert_eq!(config.demo.interval, Interval::Daily);

        let options = config.generator_options();
        assert_eq!(options.as_of, config.as_of());
        assert!(options.anomaly.is_none());
    }

    #[test]
    fn test_unknown_period_in_config() {
        let config = parse_config(
            r#"
            [generator]
            [demo]
            set = "customers"
            period = "lastQuarter"
            interval = "monthly"
            "#,
        )
        .unwrap();
        assert_eq!(config.demo.period, Period::Default);
        assert_eq!(config.demo.interval, Interval::Monthly);
    }

    #[test]
    fn test_generator_section_is_optional() {
        let config = parse_config(
            r#"
            [demo]
            set = "customers"
            period = "last7days"
            interval = "weekly"
            "#,
        )
        .unwrap();
        assert_eq!(config.generator.as_of, None);
        assert_eq!(config.generator.seed, None);
        assert!(config.anomaly.is_none());
        assert_eq!(config.demo.set, "customers");

        let empty = parse_config("").unwrap();
        assert_eq!(empty.demo.set, "billing_overview");
    }

    #[test]
    fn test_invalid_interval_is_an_error() {
        let config = parse_config(
            r#"
            [generator]
            [demo]
            set = "customers"
            period = "last7days"
            interval = "hourly"
            "#,
        );
        assert!(config.is_err());
    }
}
