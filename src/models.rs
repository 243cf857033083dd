use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery platform a shift was worked on. Labels the app does not know
/// about are kept verbatim in `Other` so imported data round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    UberEats,
    Lieferando,
    Flink,
    Other(String),
}

impl Platform {
    pub fn label(&self) -> &str {
        match self {
            Platform::UberEats => "Uber Eats",
            Platform::Lieferando => "Lieferando",
            Platform::Flink => "Flink",
            Platform::Other(label) => label,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Other(String::new())
    }
}

impl From<String> for Platform {
    fn from(label: String) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("uber eats") {
            Platform::UberEats
        } else if label.eq_ignore_ascii_case("lieferando") {
            Platform::Lieferando
        } else if label.eq_ignore_ascii_case("flink") {
            Platform::Flink
        } else {
            Platform::Other(label.to_string())
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShiftType {
    #[default]
    Full,
    Half,
}

impl ShiftType {
    pub fn label(self) -> &'static str {
        match self {
            ShiftType::Full => "Full",
            ShiftType::Half => "Half",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("full") {
            Some(ShiftType::Full)
        } else if value.eq_ignore_ascii_case("half") {
            Some(ShiftType::Half)
        } else {
            None
        }
    }
}

/// One logged work session. `end_time` earlier than `start_time` means the
/// shift ran past midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRecord {
    #[serde(default)]
    pub id: u64,
    pub date: NaiveDate,
    #[serde(default)]
    pub platform: Platform,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_hours: f64,
    pub online_tips: f64,
    pub cash_tips: f64,
    pub total_tips: f64,
    pub orders: u32,
    #[serde(default)]
    pub shift_type: ShiftType,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShiftRecord {
    /// Hours and tip amounts must be finite and non-negative.
    pub fn validate_amounts(&self) -> Result<(), String> {
        let amounts = [
            ("totalHours", self.total_hours),
            ("onlineTips", self.online_tips),
            ("cashTips", self.cash_tips),
            ("totalTips", self.total_tips),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{field} must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: u64,
    pub period: GoalPeriod,
    pub target_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub next_shift_id: u64,
    #[serde(default)]
    pub next_goal_id: u64,
    #[serde(default)]
    pub shifts: Vec<ShiftRecord>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl AppData {
    pub fn shift(&self, id: u64) -> Option<&ShiftRecord> {
        self.shifts.iter().find(|shift| shift.id == id)
    }

    /// Stores the record under a fresh id, ignoring whatever id it carried.
    pub fn insert_shift(&mut self, mut shift: ShiftRecord) -> ShiftRecord {
        self.next_shift_id = self.next_shift_id.max(self.max_shift_id()) + 1;
        shift.id = self.next_shift_id;
        self.shifts.push(shift.clone());
        shift
    }

    pub fn update_shift(&mut self, id: u64, mut shift: ShiftRecord) -> Option<ShiftRecord> {
        let slot = self.shifts.iter_mut().find(|existing| existing.id == id)?;
        shift.id = id;
        *slot = shift.clone();
        Some(shift)
    }

    pub fn delete_shift(&mut self, id: u64) -> Option<ShiftRecord> {
        let index = self.shifts.iter().position(|shift| shift.id == id)?;
        Some(self.shifts.remove(index))
    }

    pub fn insert_goal(&mut self, mut goal: Goal) -> Goal {
        let max_id = self.goals.iter().map(|goal| goal.id).max().unwrap_or(0);
        self.next_goal_id = self.next_goal_id.max(max_id) + 1;
        goal.id = self.next_goal_id;
        self.goals.push(goal.clone());
        goal
    }

    pub fn delete_goal(&mut self, id: u64) -> Option<Goal> {
        let index = self.goals.iter().position(|goal| goal.id == id)?;
        Some(self.goals.remove(index))
    }

    fn max_shift_id(&self) -> u64 {
        self.shifts.iter().map(|shift| shift.id).max().unwrap_or(0)
    }
}

/// Body of create/update requests. Totals are derived server side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub platform: Platform,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub online_tips: f64,
    #[serde(default)]
    pub cash_tips: f64,
    #[serde(default)]
    pub orders: u32,
    #[serde(default)]
    pub shift_type: ShiftType,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub period: GoalPeriod,
    pub target_amount: f64,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TodayQuery {
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShiftListQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub platform: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportQuery {
    pub platform: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped: usize,
}
