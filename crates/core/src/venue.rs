use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trading venues the engine synchronizes funding rates from.
///
/// The database stores the upper-case string form; venue rows are seeded at
/// startup and never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VenueCode {
    Binance,
    Bybit,
    Hyperliquid,
    Mexc,
}

impl VenueCode {
    pub const ALL: [VenueCode; 4] = [
        VenueCode::Binance,
        VenueCode::Bybit,
        VenueCode::Hyperliquid,
        VenueCode::Mexc,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            VenueCode::Binance => "BINANCE",
            VenueCode::Bybit => "BYBIT",
            VenueCode::Hyperliquid => "HYPERLIQUID",
            VenueCode::Mexc => "MEXC",
        }
    }
}

impl fmt::Display for VenueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown venue code: {0}")]
pub struct UnknownVenue(pub String);

impl FromStr for VenueCode {
    type Err = UnknownVenue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BINANCE" => Ok(VenueCode::Binance),
            "BYBIT" => Ok(VenueCode::Bybit),
            "HYPERLIQUID" => Ok(VenueCode::Hyperliquid),
            "MEXC" => Ok(VenueCode::Mexc),
            other => Err(UnknownVenue(other.to_string())),
        }
    }
}
