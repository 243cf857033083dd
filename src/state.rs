use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Applies `change` to a copy of the data, writes the copy to disk and
    /// only then swaps it in. A failed change or write leaves memory as it was.
    pub async fn update<T>(
        &self,
        change: impl FnOnce(&mut AppData) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let value = change(&mut next)?;
        persist_data(&self.data_path, &next).await?;
        *data = next;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Platform, ShiftRecord, ShiftType};
    use chrono::{NaiveDate, NaiveTime};

    fn shift() -> ShiftRecord {
        ShiftRecord {
            id: 0,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            platform: Platform::Flink,
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            total_hours: 4.0,
            online_tips: 6.0,
            cash_tips: 2.0,
            total_tips: 8.0,
            orders: 5,
            shift_type: ShiftType::Half,
            notes: None,
        }
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_untouched() {
        // A directory cannot be written as a file.
        let state = AppState::new(std::env::temp_dir(), AppData::default());
        let result = state.update(|data| Ok(data.insert_shift(shift()))).await;
        assert!(result.is_err());

        let data = state.data.lock().await;
        assert!(data.shifts.is_empty());
        assert_eq!(data.next_shift_id, 0);
    }

    #[tokio::test]
    async fn rejected_change_is_not_applied() {
        let mut path = std::env::temp_dir();
        path.push(format!("rider_tips_state_reject_{}.json", std::process::id()));
        let state = AppState::new(path.clone(), AppData::default());

        let result: Result<(), AppError> = state
            .update(|data| {
                data.insert_shift(shift());
                Err(AppError::bad_request("nope"))
            })
            .await;
        assert!(result.is_err());
        assert!(state.data.lock().await.shifts.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn successful_update_is_kept_and_written() {
        let mut path = std::env::temp_dir();
        path.push(format!("rider_tips_state_ok_{}.json", std::process::id()));
        let state = AppState::new(path.clone(), AppData::default());

        let stored = state.update(|data| Ok(data.insert_shift(shift()))).await.unwrap();
        assert_eq!(stored.id, 1);
        assert_eq!(state.data.lock().await.shifts.len(), 1);
        assert_eq!(crate::storage::load_data(&path).await.shifts.len(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
