pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::MexcAdapter;
pub use client::{MexcClient, MEXC_CONTRACT_URL};
