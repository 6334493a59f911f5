use uuid::Uuid;

/// Filter for history and online queries. All fields optional; absent
/// fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateFilter {
    pub venue_id: Option<Uuid>,
    /// Normalized symbol.
    pub symbol: Option<String>,
    /// Inclusive lower bound on `ts_rate`, epoch ms.
    pub from: Option<i64>,
    /// Inclusive upper bound on `ts_rate`, epoch ms.
    pub to: Option<i64>,
}

impl RateFilter {
    #[must_use]
    pub fn for_venue(venue_id: Uuid) -> Self {
        Self {
            venue_id: Some(venue_id),
            ..Self::default()
        }
    }
}
