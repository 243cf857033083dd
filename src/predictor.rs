//! Next-week tips forecast.
//!
//! Recent weekly totals are combined with a linearly decaying weight (the
//! current week counts fully, each older week 0.1 less). The spread of those
//! totals drives both the confidence tier and the width of the range.

use crate::models::ShiftRecord;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

const LOOKBACK_WEEKS: i64 = 8;
const WEIGHT_STEP: f64 = 0.1;
const HIGH_CONFIDENCE_WEEKS: usize = 6;
const MEDIUM_CONFIDENCE_WEEKS: usize = 4;
const HIGH_CONFIDENCE_SPREAD: f64 = 0.2;

pub const NO_DATA_EXPLANATION: &str = "Not enough data to make a prediction.";
pub const NO_RECENT_DATA_EXPLANATION: &str = "No recent data found in the last 8 weeks.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_total_tips: f64,
    pub min_range: f64,
    pub max_range: f64,
    pub confidence: Confidence,
    pub explanation: String,
    pub weeks_of_data: usize,
}

impl PredictionResult {
    fn insufficient(explanation: &str) -> Self {
        Self {
            predicted_total_tips: 0.0,
            min_range: 0.0,
            max_range: 0.0,
            confidence: Confidence::Low,
            explanation: explanation.to_string(),
            weeks_of_data: 0,
        }
    }
}

pub fn predict_next_week(records: &[ShiftRecord], today: NaiveDate) -> PredictionResult {
    if records.is_empty() {
        return PredictionResult::insufficient(NO_DATA_EXPLANATION);
    }

    let weekly_totals = weekly_totals(records, today);
    if weekly_totals.is_empty() {
        return PredictionResult::insufficient(NO_RECENT_DATA_EXPLANATION);
    }

    let predicted = weighted_average(&weekly_totals);
    let totals: Vec<f64> = weekly_totals.values().copied().collect();
    let (mean, std_dev) = mean_and_sample_std_dev(&totals);

    let confidence = if totals.len() >= HIGH_CONFIDENCE_WEEKS && std_dev < mean * HIGH_CONFIDENCE_SPREAD {
        Confidence::High
    } else if totals.len() >= MEDIUM_CONFIDENCE_WEEKS {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    let multiplier = if confidence == Confidence::High { 1.0 } else { 1.5 };
    let margin = std_dev * multiplier;

    PredictionResult {
        predicted_total_tips: predicted,
        min_range: (predicted - margin).max(0.0),
        max_range: predicted + margin,
        confidence,
        explanation: explanation(confidence, totals.len(), predicted),
        weeks_of_data: totals.len(),
    }
}

/// Whole weeks between `date` and `today`, floored. Only dates inside the
/// look-back window `(today - 8 weeks, today]` have an index.
pub fn week_index(date: NaiveDate, today: NaiveDate) -> Option<u32> {
    let cutoff = today - Duration::weeks(LOOKBACK_WEEKS);
    if date <= cutoff || date > today {
        return None;
    }
    u32::try_from((today - date).num_days() / 7).ok()
}

/// Tip totals keyed by week index. Weeks with no shift have no entry.
pub fn weekly_totals(records: &[ShiftRecord], today: NaiveDate) -> BTreeMap<u32, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        if let Some(index) = week_index(record.date, today) {
            *totals.entry(index).or_insert(0.0) += record.total_tips;
        }
    }
    totals
}

fn weighted_average(weekly_totals: &BTreeMap<u32, f64>) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for index in 0..LOOKBACK_WEEKS as u32 {
        let weight = 1.0 - f64::from(index) * WEIGHT_STEP;
        if weight <= 0.0 {
            break;
        }
        let Some(total) = weekly_totals.get(&index) else {
            continue;
        };
        weighted_sum += total * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

/// Mean and Bessel-corrected standard deviation. The deviation is 0 below two
/// samples.
fn mean_and_sample_std_dev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / (count - 1.0);
    (mean, variance.sqrt())
}

fn explanation(confidence: Confidence, weeks: usize, predicted: f64) -> String {
    match confidence {
        Confidence::High => format!(
            "Based on your consistent earnings over {weeks} weeks, we're very confident you'll earn around €{predicted:.2} next week."
        ),
        Confidence::Medium => format!(
            "Your earnings fluctuate slightly. You're likely to see about €{predicted:.2}, assuming a similar schedule."
        ),
        Confidence::Low => format!(
            "Data is limited. This is a rough estimate of €{predicted:.2} based on {weeks} week(s) tracked so far."
        ),
    }
}
