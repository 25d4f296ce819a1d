//! Rounding, value formatting and chart labels.

use chrono::NaiveDate;
use contracts::shared::metrics::{Interval, MetricUnit};

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds a generated value the way its unit is displayed:
/// counts are whole, money and rates keep 2 decimals.
pub fn round_for_unit(value: f64, unit: MetricUnit) -> f64 {
    match unit {
        MetricUnit::Number => value.round(),
        MetricUnit::Currency | MetricUnit::Percentage => round2(value),
    }
}

/// Formats a number with a thousands separator (comma) and the given decimals.
///
/// # Examples
/// ```
/// use billing_metrics::shared::format::format_with_decimals;
/// assert_eq!(format_with_decimals(1234567.891, 2), "1,234,567.89");
/// assert_eq!(format_with_decimals(42.0, 0), "42");
/// ```
pub fn format_with_decimals(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in integer_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let mut result: String = grouped.chars().rev().collect();

    if let Some(d) = decimal_part {
        result.push('.');
        result.push_str(d);
    }
    if value < 0.0 && result.chars().any(|c| c != '0' && c != '.' && c != ',') {
        result.insert(0, '-');
    }
    result
}

/// Formats a headline value for its unit: `$48,250.00`, `2.80%`, `2,412`.
pub fn format_value(value: f64, unit: MetricUnit) -> String {
    match unit {
        MetricUnit::Currency => {
            let amount = format_with_decimals(value, 2);
            match amount.strip_prefix('-') {
                Some(abs) => format!("-${}", abs),
                None => format!("${}", amount),
            }
        }
        MetricUnit::Percentage => format!("{}%", format_with_decimals(value, 2)),
        MetricUnit::Number => format_with_decimals(value, 0),
    }
}

/// Axis label of a bucket starting at `date`.
pub fn label_for(interval: Interval, date: NaiveDate) -> String {
    match interval {
        Interval::Monthly => date.format("%b %Y").to_string(),
        Interval::Weekly | Interval::Daily => date.format("%b %-d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_for_unit() {
        assert_eq!(round_for_unit(12.345_6, MetricUnit::Currency), 12.35);
        assert_eq!(round_for_unit(2.804, MetricUnit::Percentage), 2.8);
        assert_eq!(round_for_unit(6.57, MetricUnit::Number), 7.0);
    }

    #[test]
    fn test_format_with_decimals() {
        assert_eq!(format_with_decimals(0.0, 2), "0.00");
        assert_eq!(format_with_decimals(999.0, 0), "999");
        assert_eq!(format_with_decimals(1000.0, 0), "1,000");
        assert_eq!(format_with_decimals(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_with_decimals(-1234.5, 2), "-1,234.50");
        assert_eq!(format_with_decimals(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(48250.0, MetricUnit::Currency), "$48,250.00");
        assert_eq!(format_value(-12.5, MetricUnit::Currency), "-$12.50");
        assert_eq!(format_value(2.8, MetricUnit::Percentage), "2.80%");
        assert_eq!(format_value(2412.0, MetricUnit::Number), "2,412");
    }

    #[test]
    fn test_label_for() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(label_for(Interval::Monthly, date), "Mar 2025");
        assert_eq!(label_for(Interval::Weekly, date), "Mar 3");
        assert_eq!(label_for(Interval::Daily, date), "Mar 3");
    }
}
