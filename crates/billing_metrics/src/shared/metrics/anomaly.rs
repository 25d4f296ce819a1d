use serde::{Deserialize, Serialize};

use super::catalog::ids;

/// Hand-authored spike applied to one metric on top of the growth model.
///
/// Each tail lists multipliers for the *last* buckets of a range: a tail of
/// `[1.2, 1.4]` on twelve months scales month 11 by 1.2 and month 12 by 1.4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalySchedule {
    pub metric: String,
    /// Multipliers for the final months of the history.
    #[serde(default)]
    pub monthly_tail: Vec<f64>,
    /// Multipliers for the final weeks of the last month. Weeks of the last
    /// month not covered by the tail get 1.0 and no jitter.
    #[serde(default)]
    pub weekly_tail: Vec<f64>,
    /// Multipliers for the final days of the last week.
    #[serde(default)]
    pub daily_final_week_tail: Vec<f64>,
    /// Multipliers for the final days of the second-to-last week.
    #[serde(default)]
    pub daily_prior_week_tail: Vec<f64>,
}

impl AnomalySchedule {
    /// The overage revenue spike shown in product demos.
    pub fn overage_revenue() -> Self {
        Self {
            metric: ids::overage_revenue().0,
            monthly_tail: vec![1.2, 1.4],
            weekly_tail: vec![1.15, 1.4],
            daily_final_week_tail: vec![1.2, 1.4],
            daily_prior_week_tail: vec![1.1, 1.2],
        }
    }

    pub fn applies_to(&self, metric: &str) -> bool {
        self.metric == metric
    }

    pub fn monthly_multiplier(&self, month: usize, months: usize) -> Option<f64> {
        tail_multiplier(&self.monthly_tail, month, months)
    }

    /// Scripted factor for week `week` of month `month`; `None` means "use jitter".
    pub fn weekly_multiplier(
        &self,
        month: usize,
        months: usize,
        week: usize,
        weeks: usize,
    ) -> Option<f64> {
        if month + 1 != months {
            return None;
        }
        Some(tail_multiplier(&self.weekly_tail, week, weeks).unwrap_or(1.0))
    }

    /// Scripted factor for day `day` of week `week`; `None` means "use jitter".
    pub fn daily_multiplier(
        &self,
        week: usize,
        weeks: usize,
        day: usize,
        days: usize,
    ) -> Option<f64> {
        let tail = if week + 1 == weeks {
            &self.daily_final_week_tail
        } else if week + 2 == weeks {
            &self.daily_prior_week_tail
        } else {
            return None;
        };
        tail_multiplier(tail, day, days)
    }
}

fn tail_multiplier(tail: &[f64], index: usize, len: usize) -> Option<f64> {
    let start = len.checked_sub(tail.len())?;
    if index < start {
        None
    } else {
        tail.get(index - start).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_tail() {
        let s = AnomalySchedule::overage_revenue();
        assert_eq!(s.monthly_multiplier(9, 12), None);
        assert_eq!(s.monthly_multiplier(10, 12), Some(1.2));
        assert_eq!(s.monthly_multiplier(11, 12), Some(1.4));
    }

    #[test]
    fn test_weekly_only_in_final_month() {
        let s = AnomalySchedule::overage_revenue();
        assert_eq!(s.weekly_multiplier(10, 12, 3, 4), None);
        assert_eq!(s.weekly_multiplier(11, 12, 0, 4), Some(1.0));
        assert_eq!(s.weekly_multiplier(11, 12, 1, 4), Some(1.0));
        assert_eq!(s.weekly_multiplier(11, 12, 2, 4), Some(1.15));
        assert_eq!(s.weekly_multiplier(11, 12, 3, 4), Some(1.4));
    }

    #[test]
    fn test_daily_last_two_weeks() {
        let s = AnomalySchedule::overage_revenue();
        assert_eq!(s.daily_multiplier(47, 48, 4, 7), None);
        assert_eq!(s.daily_multiplier(47, 48, 5, 7), Some(1.2));
        assert_eq!(s.daily_multiplier(47, 48, 6, 7), Some(1.4));
        assert_eq!(s.daily_multiplier(46, 48, 6, 7), Some(1.2));
        assert_eq!(s.daily_multiplier(45, 48, 6, 7), None);
    }

    #[test]
    fn test_tail_longer_than_range_is_ignored() {
        assert_eq!(tail_multiplier(&[1.1, 1.2, 1.3], 0, 2), None);
        assert_eq!(tail_multiplier(&[], 0, 2), None);
    }

    #[test]
    fn test_deserialize_from_toml() {
        let s: AnomalySchedule = toml::from_str(
            r#"
            metric = "mrr"
            monthly_tail = [1.5]
            "#,
        )
        .unwrap();
        assert!(s.applies_to("mrr"));
        assert_eq!(s.monthly_multiplier(11, 12), Some(1.5));
        assert!(s.weekly_tail.is_empty());
        assert_eq!(s.weekly_multiplier(11, 12, 3, 4), Some(1.0));
    }
}
