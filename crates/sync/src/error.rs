use funding_core::VenueError;
use thiserror::Error;

/// Pipeline-level error taxonomy.
///
/// Per-symbol venue errors are absorbed inside a job (logged, symbol
/// skipped); what escapes a pipeline `run` is a database failure, a
/// cancellation, or a venue failure on the catalog call itself.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Venue(#[from] VenueError),

    #[error("database error")]
    Database(#[source] anyhow::Error),

    #[error("validation: {0}")]
    Validation(String),

    #[error("cancelled")]
    Cancelled,
}

impl SyncError {
    pub fn validation(message: impl Into<String>) -> Self {
        SyncError::Validation(message.into())
    }
}
