use crate::models::{AppData, ShiftRecord};
use crate::transfer::TransferError;
use serde::{Deserialize, Serialize};

pub const BACKUP_VERSION: u32 = 1;

/// Full JSON snapshot of the logged shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub version: u32,
    /// Milliseconds since the Unix epoch at creation time.
    pub timestamp: i64,
    pub shifts: Vec<ShiftRecord>,
}

pub fn create_backup(records: &[ShiftRecord], timestamp: i64) -> BackupFile {
    BackupFile {
        version: BACKUP_VERSION,
        timestamp,
        shifts: records.to_vec(),
    }
}

pub fn to_json(backup: &BackupFile) -> Result<Vec<u8>, TransferError> {
    Ok(serde_json::to_vec_pretty(backup)?)
}

pub fn parse_backup(bytes: &[u8]) -> Result<BackupFile, TransferError> {
    let backup: BackupFile = serde_json::from_slice(bytes)?;
    if backup.version > BACKUP_VERSION {
        return Err(TransferError::UnsupportedVersion(backup.version));
    }
    for (index, shift) in backup.shifts.iter().enumerate() {
        shift
            .validate_amounts()
            .map_err(|reason| TransferError::InvalidShift { index, reason })?;
    }
    Ok(backup)
}

/// Adds every shift in the backup to `data` under a fresh id. Existing
/// records are kept. Returns the number of shifts added.
pub fn restore(data: &mut AppData, backup: BackupFile) -> usize {
    let count = backup.shifts.len();
    for shift in backup.shifts {
        data.insert_shift(shift);
    }
    count
}
