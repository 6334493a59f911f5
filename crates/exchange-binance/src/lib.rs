pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::BinanceAdapter;
pub use client::{BinanceClient, BINANCE_FUTURES_URL};
