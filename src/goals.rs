use crate::aggregator::{month_start, sum_tips_between, week_start};
use crate::models::{Goal, GoalInput, GoalPeriod, ShiftRecord};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal: Goal,
    pub window_start: NaiveDate,
    pub earned: f64,
    pub remaining: f64,
    pub percent: f64,
    pub achieved: bool,
}

pub fn period_start(period: GoalPeriod, today: NaiveDate) -> NaiveDate {
    match period {
        GoalPeriod::Daily => today,
        GoalPeriod::Weekly => week_start(today),
        GoalPeriod::Monthly => month_start(today),
    }
}

/// Builds a goal anchored at the start of the current period. Targets must
/// be positive.
pub fn new_goal(input: &GoalInput, today: NaiveDate) -> Option<Goal> {
    if !input.target_amount.is_finite() || input.target_amount <= 0.0 {
        return None;
    }
    Some(Goal {
        id: 0,
        period: input.period,
        target_amount: input.target_amount,
        start_date: period_start(input.period, today),
        end_date: input.end_date,
        active: true,
        created_at: today,
    })
}

pub fn progress(goal: &Goal, records: &[ShiftRecord], today: NaiveDate) -> GoalProgress {
    let window_start = period_start(goal.period, today);
    let earned = sum_tips_between(records, window_start, today);
    let target = goal.target_amount;

    let mut goal = goal.clone();
    if goal.end_date.is_some_and(|end| end < today) {
        goal.active = false;
    }

    GoalProgress {
        goal,
        window_start,
        earned,
        remaining: (target - earned).max(0.0),
        percent: if target > 0.0 { earned / target * 100.0 } else { 0.0 },
        achieved: target > 0.0 && earned >= target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Platform, ShiftType};
    use chrono::NaiveTime;

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    fn shift(day: &str, tips: f64) -> ShiftRecord {
        ShiftRecord {
            id: 0,
            date: date(day),
            platform: Platform::Flink,
            start_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            total_hours: 4.0,
            online_tips: tips,
            cash_tips: 0.0,
            total_tips: tips,
            orders: 5,
            shift_type: ShiftType::Half,
            notes: None,
        }
    }

    fn goal(period: GoalPeriod, target: f64) -> Goal {
        new_goal(
            &GoalInput {
                period,
                target_amount: target,
                end_date: None,
            },
            date("2026-01-08"),
        )
        .expect("valid goal")
    }

    #[test]
    fn new_goal_anchors_to_period_start() {
        assert_eq!(goal(GoalPeriod::Daily, 10.0).start_date, date("2026-01-08"));
        assert_eq!(goal(GoalPeriod::Weekly, 10.0).start_date, date("2026-01-05"));
        assert_eq!(goal(GoalPeriod::Monthly, 10.0).start_date, date("2026-01-01"));
    }

    #[test]
    fn new_goal_rejects_non_positive_targets() {
        let input = GoalInput {
            period: GoalPeriod::Weekly,
            target_amount: 0.0,
            end_date: None,
        };
        assert!(new_goal(&input, date("2026-01-08")).is_none());
    }

    #[test]
    fn weekly_progress_counts_from_monday() {
        let records = vec![
            shift("2026-01-04", 100.0),
            shift("2026-01-05", 30.0),
            shift("2026-01-07", 20.0),
        ];
        let progress = progress(&goal(GoalPeriod::Weekly, 200.0), &records, date("2026-01-08"));
        assert_eq!(progress.earned, 50.0);
        assert_eq!(progress.remaining, 150.0);
        assert_eq!(progress.percent, 25.0);
        assert!(!progress.achieved);
    }

    #[test]
    fn reaching_the_target_marks_it_achieved() {
        let records = vec![shift("2026-01-08", 45.0)];
        let progress = progress(&goal(GoalPeriod::Daily, 40.0), &records, date("2026-01-08"));
        assert!(progress.achieved);
        assert_eq!(progress.remaining, 0.0);
    }

    #[test]
    fn expired_goals_report_inactive() {
        let mut expired = goal(GoalPeriod::Monthly, 500.0);
        expired.end_date = Some(date("2026-01-07"));
        let progress = progress(&expired, &[], date("2026-01-08"));
        assert!(!progress.goal.active);
        assert_eq!(progress.percent, 0.0);
    }
}
