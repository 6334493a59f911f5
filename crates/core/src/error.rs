use crate::venue::VenueCode;
use thiserror::Error;

/// Errors surfaced by venue adapters.
///
/// Adapters never retry on their own; the sync kernel inspects
/// [`VenueError::is_transient`] to decide whether another attempt is worth it.
#[derive(Debug, Error)]
pub enum VenueError {
    /// The request succeeded at the transport layer but the venue reported
    /// failure, or a required payload was missing.
    #[error("{venue} api error: {message}")]
    Api { venue: VenueCode, message: String },

    /// The payload was valid but empty where one observation was required.
    #[error("{venue} returned no funding data for {symbol}")]
    Empty { venue: VenueCode, symbol: String },

    /// I/O-level failure talking to the venue.
    #[error("transport error")]
    Transport(#[from] reqwest::Error),
}

impl VenueError {
    pub fn api(venue: VenueCode, message: impl Into<String>) -> Self {
        VenueError::Api {
            venue,
            message: message.into(),
        }
    }

    /// Transient failures are retried by the kernel; an empty result is a
    /// definitive answer and is not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        !matches!(self, VenueError::Empty { .. })
    }
}
