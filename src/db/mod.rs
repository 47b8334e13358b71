pub mod client;

pub use client::{DatabaseClient, DbClientError, RequestPriority, Row, TimestampBound};
