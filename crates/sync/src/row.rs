//! Row construction and validation.

use crate::error::SyncError;
use funding_core::{normalize_symbol, FundingObservation, FundingSymbolInfo};
use funding_data::{FundingHistoryRecord, OnlineFundingRecord};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Builds a history row from a catalog entry and one observation.
///
/// The interval comes from the catalog when the venue reports it there,
/// falling back to the observation's own field; a row with neither, with an
/// interval outside 1..=24 hours, or with a zero funding time is rejected.
///
/// # Errors
/// Returns a validation error for the malformed-row cases above.
pub fn build_history_row(
    venue_id: Uuid,
    info: &FundingSymbolInfo,
    observation: &FundingObservation,
    fetched_at: i64,
) -> Result<FundingHistoryRecord, SyncError> {
    let (interval_hours, ts_rate) = validate(info, observation)?;

    Ok(FundingHistoryRecord {
        id: Uuid::new_v4(),
        venue_id,
        symbol: normalize_symbol(&info.symbol_name),
        name: info.symbol_name.clone(),
        interval_hours,
        rate: observation.rate,
        open_interest: Decimal::ZERO,
        ts_rate,
        fetched_at,
    })
}

/// Builds a fresh online row.
///
/// # Errors
/// Same validation rules as [`build_history_row`].
pub fn build_online_row(
    venue_id: Uuid,
    info: &FundingSymbolInfo,
    observation: &FundingObservation,
    fetched_at: i64,
) -> Result<OnlineFundingRecord, SyncError> {
    let (interval_hours, ts_rate) = validate(info, observation)?;

    Ok(OnlineFundingRecord {
        id: Uuid::new_v4(),
        venue_id,
        symbol: normalize_symbol(&info.symbol_name),
        name: info.symbol_name.clone(),
        interval_hours,
        rate: observation.rate,
        open_interest: Decimal::ZERO,
        ts_rate,
        fetched_at,
    })
}

/// Builds the replacement for an existing online row, keeping its `id` (and
/// therefore its identity for any downstream reference).
///
/// # Errors
/// Same validation rules as [`build_history_row`].
pub fn build_online_update(
    existing: &OnlineFundingRecord,
    info: &FundingSymbolInfo,
    observation: &FundingObservation,
    fetched_at: i64,
) -> Result<OnlineFundingRecord, SyncError> {
    let (interval_hours, ts_rate) = validate(info, observation)?;

    Ok(OnlineFundingRecord {
        id: existing.id,
        venue_id: existing.venue_id,
        symbol: normalize_symbol(&info.symbol_name),
        name: info.symbol_name.clone(),
        interval_hours,
        rate: observation.rate,
        open_interest: Decimal::ZERO,
        ts_rate,
        fetched_at,
    })
}

fn validate(
    info: &FundingSymbolInfo,
    observation: &FundingObservation,
) -> Result<(i32, i64), SyncError> {
    if observation.funding_time == 0 {
        return Err(SyncError::validation(format!(
            "{}: observation has zero funding time",
            info.symbol_name
        )));
    }

    let interval_hours = info
        .interval_hours
        .or(observation.interval_hours)
        .ok_or_else(|| {
            SyncError::validation(format!("{}: no funding interval source", info.symbol_name))
        })?;

    if !(1..=24).contains(&interval_hours) {
        return Err(SyncError::validation(format!(
            "{}: funding interval {}h out of range",
            info.symbol_name, interval_hours
        )));
    }

    Ok((interval_hours, observation.funding_time))
}
