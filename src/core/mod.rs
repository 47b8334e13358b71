

pub mod config;
pub mod error;
pub mod logging;

pub use self::config::TruncateConfig;
pub use self::error::{Result, TruncateError};
pub use self::logging::init_tracing;
