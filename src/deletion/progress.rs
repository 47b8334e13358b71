

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::DeleteStatus;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionProgress {
    pub table_name: String,
    pub status: DeleteStatus,
    /// Rows present at the first successful count; zero until then.
    pub total_rows: u64,
    pub remained_rows: u64,
    pub last_observed_at: Option<DateTime<Utc>>,
}

impl DeletionProgress {
    pub fn deleted_rows(&self) -> u64 {
        self.total_rows.saturating_sub(self.remained_rows)
    }

    pub fn percent_complete(&self) -> Option<f64> {
        if self.status.is_terminal() {
            return Some(100.0);
        }
        if self.total_rows == 0 {
            return None;
        }
        Some(self.deleted_rows() as f64 * 100.0 / self.total_rows as f64)
    }
}

impl fmt::Display for DeletionProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({} / {} rows remaining)",
            self.table_name, self.status, self.remained_rows, self.total_rows
        )
    }
}
