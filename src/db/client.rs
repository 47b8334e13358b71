

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};
use thiserror::Error;

use crate::core::error::TruncateError;


pub type Row = serde_json::Map<String, serde_json::Value>;


#[derive(Debug, Error)]
pub enum DbClientError {
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Column not found in result: {0}")]
    MissingColumn(String),
    #[error("Query returned no rows")]
    EmptyResult,
    #[error("Unexpected value: {0}")]
    InvalidValue(String),
}

/// Request priority attached to every statement; the discriminants are the
/// values the database expects on the wire.
///
/// Deserializes from either the lowercase name or the wire integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase", try_from = "PriorityValue")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RequestPriority {
    Unspecified = 0,
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
}

impl RequestPriority {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl TryFrom<i32> for RequestPriority {
    type Error = TruncateError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(TruncateError::validation(format!(
                "unknown request priority {}",
                other
            ))),
        }
    }
}


#[derive(Deserialize)]
#[serde(untagged)]
enum PriorityValue {
    Code(i64),
    Name(String),
}

impl TryFrom<PriorityValue> for RequestPriority {
    type Error = TruncateError;

    fn try_from(value: PriorityValue) -> Result<Self, Self::Error> {
        match value {
            PriorityValue::Code(code) => i32::try_from(code)
                .map_err(|_| {
                    TruncateError::validation(format!("unknown request priority {}", code))
                })
                .and_then(<Self as TryFrom<i32>>::try_from),
            PriorityValue::Name(name) => name.parse().map_err(|_| {
                TruncateError::validation(format!("unknown request priority {:?}", name))
            }),
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampBound {
    Strong,
    /// Read at exactly `now - staleness`.
    ExactStaleness(Duration),
}


/// The database operations a table deleter needs.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a partitioned (non-transactional) DML statement and returns the
    /// lower bound of affected rows reported by the server.
    async fn partitioned_update(
        &self,
        sql: &str,
        priority: RequestPriority,
    ) -> Result<i64, DbClientError>;

    /// Executes a read-only query in a single-use transaction.
    async fn single_read(
        &self,
        sql: &str,
        bound: TimestampBound,
        priority: RequestPriority,
    ) -> Result<Vec<Row>, DbClientError>;
}
