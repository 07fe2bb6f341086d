use chrono::NaiveDate;

use super::config::AvailabilityPolicy;
use crate::matching::domain::BenchStatus;

pub const fn base_score(status: BenchStatus) -> u8 {
    match status {
        BenchStatus::OnBench => 100,
        BenchStatus::PartiallyAllocated => 60,
        BenchStatus::NotOnBench => 20,
    }
}

/// Days between the desired start and the date the candidate frees up, if later.
pub fn days_late(bench_since: Option<NaiveDate>, desired_start: NaiveDate) -> Option<i64> {
    bench_since
        .map(|since| (since - desired_start).num_days())
        .filter(|days| *days > 0)
}

pub fn evaluate(
    status: BenchStatus,
    bench_since: Option<NaiveDate>,
    desired_start: NaiveDate,
    policy: AvailabilityPolicy,
) -> u8 {
    let base = base_score(status);
    match policy {
        AvailabilityPolicy::StatusOnly => base,
        AvailabilityPolicy::DateAdjusted {
            max_penalty,
            horizon_days,
        } => {
            let Some(late) = days_late(bench_since, desired_start) else {
                return base;
            };
            let horizon = i64::from(horizon_days.max(1));
            let penalty = f64::from(max_penalty) * late.min(horizon) as f64 / horizon as f64;
            (f64::from(base) - penalty).round().clamp(0.0, 100.0) as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, day).expect("valid date")
    }

    #[test]
    fn status_only_ignores_dates() {
        let policy = AvailabilityPolicy::StatusOnly;
        assert_eq!(evaluate(BenchStatus::OnBench, Some(date(30)), date(1), policy), 100);
        assert_eq!(
            evaluate(BenchStatus::PartiallyAllocated, None, date(1), policy),
            60
        );
        assert_eq!(evaluate(BenchStatus::NotOnBench, None, date(1), policy), 20);
    }

    #[test]
    fn date_adjusted_penalizes_late_availability_linearly() {
        let policy = AvailabilityPolicy::DateAdjusted {
            max_penalty: 30,
            horizon_days: 30,
        };
        // 15 days late -> half of the maximum penalty
        assert_eq!(evaluate(BenchStatus::OnBench, Some(date(16)), date(1), policy), 85);
        // already available before the start date
        assert_eq!(evaluate(BenchStatus::OnBench, Some(date(1)), date(10), policy), 100);
        // penalty saturates at the horizon and never drops below zero
        assert_eq!(
            evaluate(
                BenchStatus::NotOnBench,
                Some(NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid")),
                date(1),
                policy
            ),
            0
        );
    }

    #[test]
    fn days_late_only_counts_future_availability() {
        assert_eq!(days_late(Some(date(5)), date(1)), Some(4));
        assert_eq!(days_late(Some(date(1)), date(5)), None);
        assert_eq!(days_late(None, date(5)), None);
    }
}
