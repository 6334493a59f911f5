//! Symbol normalization.
//!
//! Venues disagree on raw symbol spelling ("BTC_USDT", "btc-usdt", "BTCUSDT").
//! The normalized form is the engine's canonical key: `symbol` columns store
//! it, while `name` columns keep the venue's raw string.

/// Normalizes a raw venue symbol: strip `_` and `-`, upper-case the rest.
#[must_use]
pub fn normalize_symbol(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_separators_and_uppercases() {
        assert_eq!(normalize_symbol("BTC_USDT"), "BTCUSDT");
        assert_eq!(normalize_symbol("btc-usdt"), "BTCUSDT");
        assert_eq!(normalize_symbol("EthUsdt"), "ETHUSDT");
    }

    #[test]
    fn test_already_normalized_is_untouched() {
        assert_eq!(normalize_symbol("BTCUSDT"), "BTCUSDT");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["BTC_USDT", "btc-usdt", "1000PEPE_USDT", "kPEPE"] {
            let once = normalize_symbol(raw);
            assert_eq!(normalize_symbol(&once), once);
        }
    }
}
