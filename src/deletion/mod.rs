pub mod deleter;
pub mod filter;
pub mod poller;
pub mod progress;
pub mod status;


pub use deleter::{Deleter, DeleterOptions};
pub use filter::{build_count_statement, build_delete_statement, RowFilter};
pub use poller::{wait_all, PollOutcome, PollerHandle};
pub use progress::DeletionProgress;
pub use status::{DeleteStatus, StatusEvent};
