pub mod database;
pub mod filter;
pub mod models;
pub mod repositories;

pub use database::connect;
pub use filter::RateFilter;
pub use models::{FundingHistoryRecord, OnlineFundingRecord, VenueRecord};
pub use repositories::{
    HistoryStore, OnlineStore, PgHistoryRepository, PgOnlineRepository, PgVenueRepository,
    Repositories, VenueStore,
};
