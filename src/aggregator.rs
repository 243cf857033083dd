//! Calendar-bucketed sums over shift records.
//!
//! Every function here is a pure pass over the slice it is given. Windows are
//! inclusive on both ends and a window whose end precedes its start simply
//! matches nothing.

use crate::models::{Platform, ShiftRecord, ShiftType};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_shifts: usize,
    pub total_tips: f64,
    pub total_hours: f64,
    pub total_orders: u64,
    pub average_tips_per_hour: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub current_total: f64,
    pub previous_total: f64,
    pub trend_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub current: Bucket,
    pub trend: TrendResult,
}

impl PeriodSummary {
    pub fn total_tips(&self) -> f64 {
        self.current.total_tips
    }

    pub fn total_shifts(&self) -> usize {
        self.current.total_shifts
    }

    pub fn trend_percent(&self) -> i64 {
        self.trend.trend_percent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayBucket {
    pub weekday: String,
    pub total_tips: f64,
    pub shift_count: usize,
    pub average_tips: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTips {
    pub date: NaiveDate,
    pub label: String,
    pub total_tips: f64,
    /// False when no shift was logged that day, as opposed to a logged
    /// shift that earned nothing.
    pub has_data: bool,
}

/// Everything the dashboard page shows for `today`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    pub today_tips: f64,
    pub weekly: PeriodSummary,
    pub monthly: PeriodSummary,
    pub current_week: Vec<DailyTips>,
    pub best_weekday: Option<String>,
    pub best_shift_type: Option<ShiftType>,
    pub total_shifts: usize,
    pub average_tips_per_hour: f64,
    pub average_tips_per_shift: f64,
}

pub fn dashboard(records: &[ShiftRecord], today: NaiveDate) -> Dashboard {
    let monday = week_start(today);
    Dashboard {
        today,
        today_tips: sum_tips_between(records, today, today),
        weekly: weekly_summary(records, today),
        monthly: monthly_summary(records, today),
        current_week: daily_breakdown(records, monday, monday + Duration::days(6)),
        best_weekday: best_weekday(records),
        best_shift_type: best_shift_type(records),
        total_shifts: records.len(),
        average_tips_per_hour: average_tips_per_hour(records),
        average_tips_per_shift: average_tips_per_shift(records),
    }
}

/// Previous-or-same Monday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn within(record: &ShiftRecord, start: NaiveDate, end: NaiveDate) -> bool {
    start <= record.date && record.date <= end
}

pub fn sum_tips_between(records: &[ShiftRecord], start: NaiveDate, end: NaiveDate) -> f64 {
    records
        .iter()
        .filter(|record| within(record, start, end))
        .map(|record| record.total_tips)
        .sum()
}

pub fn summarize(records: &[ShiftRecord], start: NaiveDate, end: NaiveDate) -> Bucket {
    let mut bucket = Bucket {
        start,
        end,
        total_shifts: 0,
        total_tips: 0.0,
        total_hours: 0.0,
        total_orders: 0,
        average_tips_per_hour: 0.0,
    };

    for record in records.iter().filter(|record| within(record, start, end)) {
        bucket.total_shifts += 1;
        bucket.total_tips += record.total_tips;
        bucket.total_hours += record.total_hours;
        bucket.total_orders = bucket.total_orders.saturating_add(u64::from(record.orders));
    }

    if bucket.total_hours > 0.0 {
        bucket.average_tips_per_hour = bucket.total_tips / bucket.total_hours;
    }
    bucket
}

/// Percent change from `previous` to `current`, rounded. A previous period
/// with nothing earned yields 0.
pub fn trend(current: f64, previous: f64) -> TrendResult {
    let trend_percent = if previous > 0.0 {
        ((current - previous) / previous * 100.0).round() as i64
    } else {
        0
    };

    TrendResult {
        current_total: current,
        previous_total: previous,
        trend_percent,
    }
}

pub fn weekly_summary(records: &[ShiftRecord], today: NaiveDate) -> PeriodSummary {
    let start = week_start(today);
    let current = summarize(records, start, today);
    let previous = sum_tips_between(records, start - Duration::weeks(1), start - Duration::days(1));

    PeriodSummary {
        trend: trend(current.total_tips, previous),
        current,
    }
}

pub fn monthly_summary(records: &[ShiftRecord], today: NaiveDate) -> PeriodSummary {
    let start = month_start(today);
    let current = summarize(records, start, today);
    let previous_end = start - Duration::days(1);
    let previous = sum_tips_between(records, month_start(previous_end), previous_end);

    PeriodSummary {
        trend: trend(current.total_tips, previous),
        current,
    }
}

/// Groups every record by day of week, Sunday first. Weekdays without a
/// record are left out.
pub fn weekday_breakdown(records: &[ShiftRecord]) -> Vec<WeekdayBucket> {
    let mut totals = [(0.0_f64, 0_usize); 7];
    for record in records {
        let slot = &mut totals[record.date.weekday().num_days_from_sunday() as usize];
        slot.0 += record.total_tips;
        slot.1 += 1;
    }

    SUNDAY_FIRST
        .iter()
        .zip(totals)
        .filter(|(_, (_, count))| *count > 0)
        .map(|(weekday, (total_tips, shift_count))| WeekdayBucket {
            weekday: weekday_name(*weekday).to_string(),
            total_tips,
            shift_count,
            average_tips: total_tips / shift_count as f64,
        })
        .collect()
}

pub fn daily_breakdown(records: &[ShiftRecord], start: NaiveDate, end: NaiveDate) -> Vec<DailyTips> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records.iter().filter(|record| within(record, start, end)) {
        *by_date.entry(record.date).or_insert(0.0) += record.total_tips;
    }

    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        let logged = by_date.get(&date).copied();
        days.push(DailyTips {
            date,
            label: day_label(date.weekday()).to_string(),
            total_tips: logged.unwrap_or(0.0),
            has_data: logged.is_some(),
        });

        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    days
}

/// Weekday with the highest average tips. On an exact tie the earlier day in
/// Sunday-first order wins.
pub fn best_weekday(records: &[ShiftRecord]) -> Option<String> {
    weekday_breakdown(records)
        .into_iter()
        .fold(None, |best: Option<WeekdayBucket>, candidate| match best {
            Some(current) if current.average_tips >= candidate.average_tips => Some(current),
            _ => Some(candidate),
        })
        .map(|bucket| bucket.weekday)
}

/// Full vs Half by average tips per shift. Needs both kinds on record and a
/// strict winner.
pub fn best_shift_type(records: &[ShiftRecord]) -> Option<ShiftType> {
    let average_of = |shift_type: ShiftType| {
        let (sum, count) = records
            .iter()
            .filter(|record| record.shift_type == shift_type)
            .fold((0.0, 0_usize), |(sum, count), record| (sum + record.total_tips, count + 1));
        (count > 0).then(|| sum / count as f64)
    };

    let full = average_of(ShiftType::Full)?;
    let half = average_of(ShiftType::Half)?;
    if full > half {
        Some(ShiftType::Full)
    } else if half > full {
        Some(ShiftType::Half)
    } else {
        None
    }
}

pub fn average_tips_per_hour(records: &[ShiftRecord]) -> f64 {
    let hours: f64 = records.iter().map(|record| record.total_hours).sum();
    if hours > 0.0 {
        records.iter().map(|record| record.total_tips).sum::<f64>() / hours
    } else {
        0.0
    }
}

pub fn average_tips_per_shift(records: &[ShiftRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|record| record.total_tips).sum::<f64>() / records.len() as f64
}

/// Planned shifts: anything dated after today, plus today's shifts that have
/// not been filled in yet (no tips or no orders).
pub fn upcoming_shifts(records: &[ShiftRecord], today: NaiveDate) -> Vec<ShiftRecord> {
    let mut upcoming: Vec<ShiftRecord> = records
        .iter()
        .filter(|record| {
            record.date > today
                || (record.date == today && (record.total_tips == 0.0 || record.orders == 0))
        })
        .cloned()
        .collect();
    upcoming.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
    upcoming
}

/// Newest first. Open bounds match everything on that side.
pub fn shifts_between(
    records: &[ShiftRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    platform: Option<&Platform>,
) -> Vec<ShiftRecord> {
    let mut matching: Vec<ShiftRecord> = records
        .iter()
        .filter(|record| start.is_none_or(|start| record.date >= start))
        .filter(|record| end.is_none_or(|end| record.date <= end))
        .filter(|record| platform.is_none_or(|platform| &record.platform == platform))
        .cloned()
        .collect();
    matching.sort_by(|a, b| (b.date, b.start_time).cmp(&(a.date, a.start_time)));
    matching
}

const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn day_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    fn shift(day: &str, tips: f64) -> ShiftRecord {
        ShiftRecord {
            id: 0,
            date: date(day),
            platform: Platform::UberEats,
            start_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            total_hours: 4.0,
            online_tips: tips,
            cash_tips: 0.0,
            total_tips: tips,
            orders: 6,
            shift_type: ShiftType::Full,
            notes: None,
        }
    }

    fn typed(day: &str, tips: f64, shift_type: ShiftType) -> ShiftRecord {
        ShiftRecord {
            shift_type,
            ..shift(day, tips)
        }
    }

    #[test]
    fn sum_is_inclusive_and_empty_safe() {
        let records = vec![
            shift("2026-01-05", 10.0),
            shift("2026-01-07", 20.0),
            shift("2026-01-09", 40.0),
        ];
        assert_eq!(sum_tips_between(&records, date("2026-01-05"), date("2026-01-07")), 30.0);
        assert_eq!(sum_tips_between(&[], date("2026-01-05"), date("2026-01-07")), 0.0);
        assert_eq!(sum_tips_between(&records, date("2026-01-09"), date("2026-01-05")), 0.0);
    }

    #[test]
    fn week_start_is_previous_or_same_monday() {
        // 2026-01-05 is a Monday.
        assert_eq!(week_start(date("2026-01-05")), date("2026-01-05"));
        assert_eq!(week_start(date("2026-01-11")), date("2026-01-05"));
        assert_eq!(week_start(date("2026-01-04")), date("2025-12-29"));
    }

    #[test]
    fn weekly_summary_compares_against_last_full_week() {
        let today = date("2026-01-08"); // Thursday
        let records = vec![
            shift("2026-01-05", 30.0),
            shift("2026-01-08", 30.0),
            shift("2026-01-09", 500.0), // after today
            shift("2025-12-29", 20.0),
            shift("2026-01-04", 30.0),
            shift("2025-12-28", 999.0), // two weeks back
        ];
        let summary = weekly_summary(&records, today);
        assert_eq!(summary.total_tips(), 60.0);
        assert_eq!(summary.total_shifts(), 2);
        assert_eq!(summary.trend.previous_total, 50.0);
        assert_eq!(summary.trend_percent(), 20);
        assert_eq!(summary.current.total_hours, 8.0);
        assert_eq!(summary.current.total_orders, 12);
    }

    #[test]
    fn trend_is_zero_when_previous_week_earned_nothing() {
        let today = date("2026-01-08");
        let records = vec![shift("2026-01-06", 50.0)];
        let summary = weekly_summary(&records, today);
        assert_eq!(summary.total_tips(), 50.0);
        assert_eq!(summary.trend.previous_total, 0.0);
        assert_eq!(summary.trend_percent(), 0);
    }

    #[test]
    fn trend_rounds_to_nearest_percent() {
        assert_eq!(trend(2.0, 3.0).trend_percent, -33);
        assert_eq!(trend(5.0, 3.0).trend_percent, 67);
        assert_eq!(trend(10.0, -5.0).trend_percent, 0);
    }

    #[test]
    fn monthly_summary_uses_whole_previous_month() {
        let today = date("2026-03-10");
        let records = vec![
            shift("2026-03-01", 40.0),
            shift("2026-03-10", 20.0),
            shift("2026-02-01", 10.0),
            shift("2026-02-28", 30.0),
            shift("2026-01-31", 100.0),
        ];
        let summary = monthly_summary(&records, today);
        assert_eq!(summary.current.start, date("2026-03-01"));
        assert_eq!(summary.total_tips(), 60.0);
        assert_eq!(summary.trend.previous_total, 40.0);
        assert_eq!(summary.trend_percent(), 50);
    }

    #[test]
    fn monthly_summary_crosses_year_boundary() {
        let records = vec![shift("2025-12-15", 80.0), shift("2026-01-02", 20.0)];
        let summary = monthly_summary(&records, date("2026-01-02"));
        assert_eq!(summary.trend.previous_total, 80.0);
        assert_eq!(summary.trend_percent(), -75);
    }

    #[test]
    fn weekday_breakdown_orders_sunday_first_and_skips_empty_days() {
        let records = vec![
            shift("2026-01-10", 30.0), // Saturday
            shift("2026-01-05", 10.0), // Monday
            shift("2026-01-12", 20.0), // Monday
            shift("2026-01-04", 5.0),  // Sunday
        ];
        let buckets = weekday_breakdown(&records);
        let names: Vec<&str> = buckets.iter().map(|bucket| bucket.weekday.as_str()).collect();
        assert_eq!(names, ["Sunday", "Monday", "Saturday"]);
        assert_eq!(buckets[1].shift_count, 2);
        assert_eq!(buckets[1].average_tips, 15.0);
    }

    #[test]
    fn daily_breakdown_flags_days_without_shifts() {
        let records = vec![shift("2026-01-05", 12.5), shift("2026-01-07", 0.0)];
        let days = daily_breakdown(&records, date("2026-01-05"), date("2026-01-08"));
        assert_eq!(days.len(), 4);
        assert!(days[0].has_data);
        assert_eq!(days[0].label, "Mon");
        assert!(!days[1].has_data);
        assert!(days[2].has_data);
        assert_eq!(days[2].total_tips, 0.0);
        assert!(!days[3].has_data);
        assert!(daily_breakdown(&records, date("2026-01-08"), date("2026-01-05")).is_empty());
    }

    #[test]
    fn daily_breakdown_total_matches_range_sum() {
        let records = vec![
            shift("2026-01-03", 4.2),
            shift("2026-01-05", 12.75),
            shift("2026-01-05", 3.1),
            shift("2026-01-09", 18.4),
            shift("2026-01-20", 50.0),
        ];
        let start = date("2026-01-04");
        let end = date("2026-01-15");
        let daily: f64 = daily_breakdown(&records, start, end)
            .iter()
            .map(|day| day.total_tips)
            .sum();
        assert!((daily - sum_tips_between(&records, start, end)).abs() < 1e-9);
    }

    #[test]
    fn best_weekday_picks_highest_average() {
        assert_eq!(best_weekday(&[]), None);
        let records = vec![
            shift("2026-01-05", 10.0), // Monday
            shift("2026-01-06", 5.0),  // Tuesday
            shift("2026-01-06", 45.0), // Tuesday
        ];
        assert_eq!(best_weekday(&records).as_deref(), Some("Tuesday"));
    }

    #[test]
    fn best_weekday_tie_goes_to_earlier_day() {
        let records = vec![shift("2026-01-09", 20.0), shift("2026-01-05", 20.0)];
        assert_eq!(best_weekday(&records).as_deref(), Some("Monday"));
    }

    #[test]
    fn best_shift_type_needs_both_groups_and_a_winner() {
        assert_eq!(best_shift_type(&[]), None);

        let only_full = vec![typed("2026-01-05", 30.0, ShiftType::Full)];
        assert_eq!(best_shift_type(&only_full), None);

        let tie = vec![
            typed("2026-01-05", 30.0, ShiftType::Full),
            typed("2026-01-06", 30.0, ShiftType::Half),
        ];
        assert_eq!(best_shift_type(&tie), None);

        let half_wins = vec![
            typed("2026-01-05", 30.0, ShiftType::Full),
            typed("2026-01-06", 10.0, ShiftType::Full),
            typed("2026-01-07", 25.0, ShiftType::Half),
        ];
        assert_eq!(best_shift_type(&half_wins), Some(ShiftType::Half));
    }

    #[test]
    fn averages_guard_against_empty_input() {
        assert_eq!(average_tips_per_hour(&[]), 0.0);
        assert_eq!(average_tips_per_shift(&[]), 0.0);
        let records = vec![shift("2026-01-05", 20.0), shift("2026-01-06", 10.0)];
        assert_eq!(average_tips_per_hour(&records), 3.75);
        assert_eq!(average_tips_per_shift(&records), 15.0);
    }

    #[test]
    fn upcoming_includes_future_and_unfinished_today() {
        let today = date("2026-01-08");
        let mut unfinished = shift("2026-01-08", 0.0);
        unfinished.orders = 0;
        let records = vec![
            shift("2026-01-10", 0.0),
            shift("2026-01-08", 25.0),
            unfinished,
            shift("2026-01-07", 0.0),
            shift("2026-01-09", 0.0),
        ];
        let upcoming = upcoming_shifts(&records, today);
        let dates: Vec<String> = upcoming.iter().map(|record| record.date.to_string()).collect();
        assert_eq!(dates, ["2026-01-08", "2026-01-09", "2026-01-10"]);
    }

    #[test]
    fn shifts_between_filters_and_sorts_newest_first() {
        let mut flink = shift("2026-01-06", 5.0);
        flink.platform = Platform::Flink;
        let records = vec![shift("2026-01-05", 1.0), flink, shift("2026-01-09", 2.0)];

        let all = shifts_between(&records, None, None, None);
        assert_eq!(all[0].date, date("2026-01-09"));
        assert_eq!(all.len(), 3);

        let ranged = shifts_between(&records, Some(date("2026-01-06")), Some(date("2026-01-08")), None);
        assert_eq!(ranged.len(), 1);

        let uber = shifts_between(&records, None, None, Some(&Platform::UberEats));
        assert_eq!(uber.len(), 2);
    }

    #[test]
    fn dashboard_covers_the_whole_current_week() {
        let today = date("2026-01-07"); // Wednesday
        let records = vec![shift("2026-01-07", 18.0), shift("2026-01-05", 12.0)];
        let view = dashboard(&records, today);
        assert_eq!(view.today_tips, 18.0);
        assert_eq!(view.current_week.len(), 7);
        assert_eq!(view.current_week[0].date, date("2026-01-05"));
        assert_eq!(view.current_week[6].date, date("2026-01-11"));
        assert!(!view.current_week[6].has_data);
        assert_eq!(view.weekly.total_tips(), 30.0);
        assert_eq!(view.total_shifts, 2);
        assert_eq!(view.best_weekday.as_deref(), Some("Wednesday"));
        assert_eq!(view.best_shift_type, None);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let today = date("2026-01-08");
        let records = vec![shift("2026-01-02", 7.3), shift("2026-01-06", 11.1)];
        assert_eq!(weekly_summary(&records, today), weekly_summary(&records, today));
        assert_eq!(weekday_breakdown(&records), weekday_breakdown(&records));
        assert_eq!(best_weekday(&records), best_weekday(&records));
    }
}
