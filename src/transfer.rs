//! CSV import and export of shift records.
//!
//! Import is lenient: columns are found by loose header matching, several
//! date and time spellings are accepted, and rows that still fail to parse
//! are reported back instead of aborting the whole file.

use crate::models::{Platform, ShiftRecord, ShiftType};
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use thiserror::Error;
use tracing::{info, warn};

const EXPORT_HEADER: [&str; 11] = [
    "Date",
    "Platform",
    "Start Time",
    "End Time",
    "Total Hours",
    "Online Tips",
    "Cash Tips",
    "Total Tips",
    "Orders",
    "Shift Type",
    "Notes",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];
const TIME_FORMATS: [&str; 3] = ["%I:%M %p", "%H:%M", "%H:%M:%S"];
const IMPORT_NOTE: &str = "Imported via CSV";

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("missing required columns: Date, Shift Start Time, Shift End Time")]
    MissingColumns,
    #[error("unsupported backup version {0}")]
    UnsupportedVersion(u32),
    #[error("backup shift {index} is invalid: {reason}")]
    InvalidShift { index: usize, reason: String },
}

impl TransferError {
    /// True when the input itself was at fault rather than the machine.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            TransferError::Csv(_)
                | TransferError::Json(_)
                | TransferError::MissingColumns
                | TransferError::UnsupportedVersion(_)
                | TransferError::InvalidShift { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub shifts: Vec<ShiftRecord>,
    pub skipped: Vec<SkippedRow>,
}

pub fn export_csv(records: &[ShiftRecord]) -> Result<String, TransferError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for record in records {
        writer.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.platform.label().to_string(),
            record.start_time.format("%H:%M").to_string(),
            record.end_time.format("%H:%M").to_string(),
            record.total_hours.to_string(),
            record.online_tips.to_string(),
            record.cash_tips.to_string(),
            record.total_tips.to_string(),
            record.orders.to_string(),
            record.shift_type.label().to_string(),
            record.notes.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn import_csv(text: &str, default_platform: &Platform) -> Result<ImportReport, TransferError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();
    let columns = Columns::locate(&headers).ok_or(TransferError::MissingColumns)?;

    let mut report = ImportReport::default();
    for (index, result) in reader.records().enumerate() {
        // Header is row 1.
        let row_number = index + 2;
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!(row = row_number, "skipping unreadable csv row: {err}");
                report.skipped.push(SkippedRow {
                    row: row_number,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        match columns.parse_row(&row, default_platform) {
            Ok(shift) => report.shifts.push(shift),
            Err(reason) => {
                warn!(row = row_number, "skipping csv row: {reason}");
                report.skipped.push(SkippedRow {
                    row: row_number,
                    reason,
                });
            }
        }
    }

    info!(
        imported = report.shifts.len(),
        skipped = report.skipped.len(),
        "csv import parsed"
    );
    Ok(report)
}

/// Length of a shift in hours. An end before the start wraps past midnight.
pub fn shift_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let mut minutes = (end - start).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    minutes as f64 / 60.0
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

struct Columns {
    date: usize,
    start: usize,
    end: usize,
    platform: Option<usize>,
    hours: Option<usize>,
    online: Option<usize>,
    cash: Option<usize>,
    total_tips: Option<usize>,
    orders: Option<usize>,
    shift_type: Option<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Option<Self> {
        let find = |matches: &dyn Fn(&str) -> bool| headers.iter().position(|header| matches(header.as_str()));

        Some(Self {
            date: find(&|h| h.contains("date"))?,
            start: find(&|h| h.contains("start"))?,
            end: find(&|h| h.contains("end"))?,
            platform: find(&|h| h.contains("platform")),
            hours: find(&|h| h.contains("hours")),
            online: find(&|h| h.contains("online") || h.contains("digital")),
            cash: find(&|h| h.contains("cash") || h.contains("physical")),
            total_tips: find(&|h| h.contains("total tips") || (h.contains("total") && h.contains("tip"))),
            orders: find(&|h| h.contains("order") || h.contains("deliveries")),
            shift_type: find(&|h| h.contains("type")),
        })
    }

    fn parse_row(&self, row: &StringRecord, default_platform: &Platform) -> Result<ShiftRecord, String> {
        let needed = self.date.max(self.start).max(self.end) + 1;
        if row.len() < needed {
            return Err(format!("expected at least {needed} columns, found {}", row.len()));
        }

        let raw = |index: usize| row.get(index).unwrap_or_default().trim();
        let optional = |index: Option<usize>| {
            index
                .and_then(|index| row.get(index))
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };
        let number = |index: Option<usize>| optional(index).and_then(|value| value.parse::<f64>().ok());

        let date = parse_date(raw(self.date))
            .ok_or_else(|| format!("unable to parse date: {}", raw(self.date)))?;
        let start_time = parse_time(raw(self.start))
            .ok_or_else(|| format!("unable to parse time: {}", raw(self.start)))?;
        let end_time = parse_time(raw(self.end))
            .ok_or_else(|| format!("unable to parse time: {}", raw(self.end)))?;

        let online_tips = number(self.online).unwrap_or(0.0);
        let cash_tips = number(self.cash).unwrap_or(0.0);

        let record = ShiftRecord {
            id: 0,
            date,
            platform: optional(self.platform)
                .map(|label| Platform::from(label.to_string()))
                .unwrap_or_else(|| default_platform.clone()),
            start_time,
            end_time,
            total_hours: number(self.hours).unwrap_or_else(|| shift_hours(start_time, end_time)),
            online_tips,
            cash_tips,
            total_tips: number(self.total_tips).unwrap_or(online_tips + cash_tips),
            orders: optional(self.orders)
                .and_then(|value| value.parse().ok())
                .unwrap_or(0),
            shift_type: optional(self.shift_type)
                .and_then(ShiftType::parse_label)
                .unwrap_or(ShiftType::Full),
            notes: Some(IMPORT_NOTE.to_string()),
        };
        record.validate_amounts()?;
        Ok(record)
    }
}
