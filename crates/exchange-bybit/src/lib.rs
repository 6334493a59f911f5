pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::BybitAdapter;
pub use client::{BybitClient, BYBIT_API_URL};
