

pub mod core;
pub mod db;
pub mod deletion;


pub use crate::core::config::TruncateConfig;
pub use crate::core::error::{Result, TruncateError};
pub use crate::core::logging::init_tracing;
pub use db::{DatabaseClient, DbClientError, RequestPriority, Row, TimestampBound};
pub use deletion::{
    DeleteStatus, Deleter, DeleterOptions, DeletionProgress, PollOutcome, PollerHandle,
    RowFilter, StatusEvent,
};


pub const DEFAULT_STALENESS_SECS: u64 = 1;


pub const DEFAULT_POLL_MULTIPLIER: u32 = 10;


pub const COUNT_COLUMN: &str = "count";
