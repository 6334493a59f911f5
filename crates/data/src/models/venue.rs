use funding_core::{UnknownVenue, VenueCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A seeded trading venue. Rows are created once at startup and never
/// deleted; history and online rows reference them with restricted delete.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VenueRecord {
    pub id: Uuid,
    pub code: String,
}

impl VenueRecord {
    /// Parses the stored code back into the enum form.
    ///
    /// # Errors
    /// Returns an error if the row carries a code the engine does not know.
    pub fn venue_code(&self) -> Result<VenueCode, UnknownVenue> {
        self.code.parse()
    }
}
