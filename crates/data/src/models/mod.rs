//! Data models for the funding-rate store.
//!
//! All models use `rust_decimal::Decimal` for financial precision and
//! epoch-millisecond `i64` timestamps. Models derive `sqlx::FromRow` for
//! database compatibility.

pub mod history;
pub mod online;
pub mod venue;

pub use history::FundingHistoryRecord;
pub use online::OnlineFundingRecord;
pub use venue::VenueRecord;
