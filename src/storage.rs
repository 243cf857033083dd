use crate::errors::AppError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error};

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AppData>(&bytes) {
            Ok(data) => {
                debug!(shifts = data.shifts.len(), goals = data.goals.len(), "loaded data file");
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;
    use crate::transfer::import_csv;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("rider_tips_{}_{}.json", name, std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.shifts.is_empty());
        assert_eq!(data.next_shift_id, 0);
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{ nope").await.unwrap();
        let data = load_data(&path).await;
        assert!(data.goals.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn csv_import_with_non_finite_tips_survives_a_restart() {
        let path = temp_path("non_finite");
        let text = "Date,Start,End,Online Tips,Cash Tips\n\
2026-01-05,10:00,14:00,3,1\n\
2026-01-06,10:00,14:00,NaN,inf\n";
        let report = import_csv(text, &Platform::default()).unwrap();
        assert_eq!(report.skipped.len(), 1);

        let mut data = AppData::default();
        for shift in report.shifts {
            data.insert_shift(shift);
        }
        persist_data(&path, &data).await.unwrap();

        let loaded = load_data(&path).await;
        assert_eq!(loaded.shifts.len(), 1);
        assert_eq!(loaded.shifts[0].total_tips, 4.0);
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_data_loads_back() {
        let path = temp_path("persist");
        let mut data = AppData::default();
        data.next_shift_id = 7;
        persist_data(&path, &data).await.unwrap();

        let loaded = load_data(&path).await;
        assert_eq!(loaded.next_shift_id, 7);
        let _ = fs::remove_file(&path).await;
    }
}
