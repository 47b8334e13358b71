

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::filter::{build_count_statement, build_delete_statement, RowFilter};
use super::progress::DeletionProgress;
use super::status::{DeleteStatus, StatusEvent};
use crate::core::config::TruncateConfig;
use crate::core::error::{Result, TruncateError};
use crate::db::{DatabaseClient, DbClientError, RequestPriority, Row, TimestampBound};
use crate::COUNT_COLUMN;


/// What the orchestrator knows about a table before its deletion starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleterOptions {
    pub table_name: String,
    /// Filter column; empty means the whole table.
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub column_values: Vec<String>,
    #[serde(default)]
    pub lower: Option<String>,
    #[serde(default)]
    pub upper: Option<String>,
    /// Name (`"high"`) or wire integer (`3`). When omitted the config's
    /// `default_priority` applies, which is `Low` (1) unless configured,
    /// not the database's `Unspecified` (0).
    #[serde(default)]
    pub priority: Option<RequestPriority>,
}

impl DeleterOptions {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub fn with_values(mut self, column: impl Into<String>, values: Vec<String>) -> Self {
        self.column = column.into();
        self.column_values = values;
        self
    }

    pub fn with_range(
        mut self,
        column: impl Into<String>,
        lower: Option<String>,
        upper: Option<String>,
    ) -> Self {
        self.column = column.into();
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn with_priority(mut self, priority: RequestPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}


#[derive(Debug, Default)]
struct ProgressState {
    status: DeleteStatus,
    total_rows: u64,
    remained_rows: u64,
    last_observed_at: Option<DateTime<Utc>>,
}


/// Deletes all (or the filtered) rows of one table and tracks how many remain.
///
/// Status and counters share one lock so that the write-once rule of
/// `total_rows` is checked and applied atomically. The lock is never held
/// across a database call.
pub struct Deleter {
    table_name: String,
    client: Arc<dyn DatabaseClient>,
    filter: RowFilter,
    priority: RequestPriority,
    config: TruncateConfig,
    delete_statement: String,
    count_statement: String,
    state: Mutex<ProgressState>,
}

impl Deleter {

    pub fn new(client: Arc<dyn DatabaseClient>, options: DeleterOptions) -> Result<Self> {
        Self::with_config(client, options, TruncateConfig::default())
    }


    pub fn with_config(
        client: Arc<dyn DatabaseClient>,
        options: DeleterOptions,
        config: TruncateConfig,
    ) -> Result<Self> {
        if options.table_name.trim().is_empty() {
            return Err(TruncateError::validation("table name must not be empty"));
        }
        config.validate()?;

        let filter = RowFilter::from_parts(
            &options.column,
            &options.column_values,
            options.lower.as_deref(),
            options.upper.as_deref(),
        );
        let priority = options.priority.unwrap_or(config.default_priority);
        let delete_statement = build_delete_statement(&options.table_name, &filter);
        let count_statement = build_count_statement(&options.table_name, &filter);

        debug!(
            "Deleter created for table {} (filter: {:?}, priority: {})",
            options.table_name,
            filter,
            priority.as_str()
        );

        Ok(Self {
            table_name: options.table_name,
            client,
            filter,
            priority,
            config,
            delete_statement,
            count_statement,
            state: Mutex::new(ProgressState::default()),
        })
    }


    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn filter(&self) -> &RowFilter {
        &self.filter
    }

    pub fn priority(&self) -> RequestPriority {
        self.priority
    }

    pub fn config(&self) -> &TruncateConfig {
        &self.config
    }

    pub fn delete_statement(&self) -> &str {
        &self.delete_statement
    }

    pub fn count_statement(&self) -> &str {
        &self.count_statement
    }

    pub fn status(&self) -> DeleteStatus {
        self.state.lock().status
    }

    pub fn total_rows(&self) -> u64 {
        self.state.lock().total_rows
    }

    pub fn remained_rows(&self) -> u64 {
        self.state.lock().remained_rows
    }


    pub fn progress(&self) -> DeletionProgress {
        let state = self.state.lock();
        DeletionProgress {
            table_name: self.table_name.clone(),
            status: state.status,
            total_rows: state.total_rows,
            remained_rows: state.remained_rows,
            last_observed_at: state.last_observed_at,
        }
    }

    /// Records that the parent table's deletion has begun; this table's rows
    /// are now removed by the cascade.
    pub fn notify_parent_deletion_started(&self) {
        self.transition(StatusEvent::ParentDeletionStarted);
    }

    /// Issues the partitioned delete and waits for it to finish.
    ///
    /// The status is not rolled back on failure; retrying is up to the caller.
    pub async fn trigger_delete(
        &self,
        cancel: &CancellationToken,
    ) -> std::result::Result<i64, DbClientError> {
        self.transition(StatusEvent::DeleteTriggered);

        info!("Starting partitioned delete on table {}", self.table_name);
        debug!("Executing: {}", self.delete_statement);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DbClientError::Cancelled),
            result = self.client.partitioned_update(&self.delete_statement, self.priority) => result,
        };

        match &result {
            Ok(affected) => info!(
                "Partitioned delete on table {} finished ({} rows affected)",
                self.table_name, affected
            ),
            Err(e) => error!("Partitioned delete on table {} failed: {}", self.table_name, e),
        }

        result
    }

    /// Counts the remaining rows with a stale read and updates progress.
    ///
    /// Nothing is updated when the read fails.
    pub async fn observe_row_count(
        &self,
        cancel: &CancellationToken,
    ) -> std::result::Result<u64, DbClientError> {
        let bound = TimestampBound::ExactStaleness(self.config.staleness());

        let rows = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DbClientError::Cancelled),
            rows = self.client.single_read(&self.count_statement, bound, self.priority) => rows,
        }?;
        let count = scan_count(&rows)?;

        let (previous, current) = {
            let mut state = self.state.lock();
            if state.total_rows == 0 {
                state.total_rows = count;
            }
            state.remained_rows = count;
            state.last_observed_at = Some(Utc::now());

            let previous = state.status;
            state.status = previous.apply(StatusEvent::RowsCounted(count));
            (previous, state.status)
        };

        debug!("Table {} has {} rows remaining", self.table_name, count);
        log_transition(&self.table_name, previous, current);

        Ok(count)
    }

    fn transition(&self, event: StatusEvent) -> DeleteStatus {
        let (previous, current) = {
            let mut state = self.state.lock();
            let previous = state.status;
            state.status = previous.apply(event);
            (previous, state.status)
        };
        log_transition(&self.table_name, previous, current);
        current
    }
}

impl std::fmt::Debug for Deleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deleter")
            .field("table_name", &self.table_name)
            .field("filter", &self.filter)
            .field("priority", &self.priority)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}


fn log_transition(table_name: &str, previous: DeleteStatus, current: DeleteStatus) {
    if previous != current {
        info!("Table {}: {} -> {}", table_name, previous, current);
    }
}

/// Reads the `count` column of the first row.
fn scan_count(rows: &[Row]) -> std::result::Result<u64, DbClientError> {
    let row = rows.first().ok_or(DbClientError::EmptyResult)?;
    let value = row
        .get(COUNT_COLUMN)
        .ok_or_else(|| DbClientError::MissingColumn(COUNT_COLUMN.to_string()))?;

    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| DbClientError::InvalidValue(format!("{} = {}", COUNT_COLUMN, n))),
        // INT64 values may arrive JSON-encoded as strings.
        serde_json::Value::String(s) => s
            .parse::<u64>()
            .map_err(|_| DbClientError::InvalidValue(format!("{} = {:?}", COUNT_COLUMN, s))),
        other => Err(DbClientError::InvalidValue(format!("{} = {}", COUNT_COLUMN, other))),
    }
}
