mod catalog;
mod feed;
mod filter;
mod model;

pub use catalog::{Listing, builtin_listings, load_watchlist};
pub use feed::{MarketFeed, MockFeed, SharedFeed, spawn_snapshot};
pub use filter::{
    ALL_SECTORS, filter_by_search, filter_by_sector, sector_performance, sectors_of, sort_stocks,
};
pub use model::{SectorPerformance, SortDirection, SortKey, Stock};
