pub mod scheduler;

pub use scheduler::{PipelineKind, SyncScheduler};
