pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::HyperliquidAdapter;
pub use client::{HyperliquidClient, HYPERLIQUID_API_URL};
