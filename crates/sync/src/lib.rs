pub mod error;
pub mod history;
pub mod kernel;
pub mod online;
pub mod plan;
pub mod report;
pub mod row;

pub use error::SyncError;
pub use history::HistoryPipeline;
pub use online::OnlinePipeline;
pub use plan::{decide, SyncAction};
pub use report::SyncReport;
pub use row::{build_history_row, build_online_row, build_online_update};
