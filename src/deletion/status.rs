

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};


#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
    EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeleteStatus {
    /// Counting the rows in the table.
    #[default]
    Analyzing,
    /// Waiting for dependent tables to be deleted.
    Waiting,
    Deleting,
    /// Rows are being removed by the parent's cascading delete.
    CascadeDeleting,
    Completed,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    RowsCounted(u64),
    ParentDeletionStarted,
    DeleteTriggered,
}

impl DeleteStatus {
    /// Computes the status after `event`.
    ///
    /// Statuses only move forward, except that a parent notification moves any
    /// unfinished table into `CascadeDeleting`.
    pub fn apply(self, event: StatusEvent) -> Self {
        match (self, event) {
            (_, StatusEvent::RowsCounted(0)) => Self::Completed,
            (Self::Analyzing, StatusEvent::RowsCounted(_)) => Self::Waiting,
            (current, StatusEvent::RowsCounted(_)) => current,

            (Self::Completed, StatusEvent::ParentDeletionStarted) => Self::Completed,
            (_, StatusEvent::ParentDeletionStarted) => Self::CascadeDeleting,

            (Self::Analyzing | Self::Waiting | Self::Deleting, StatusEvent::DeleteTriggered) => {
                Self::Deleting
            }
            (current, StatusEvent::DeleteTriggered) => current,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }
}
