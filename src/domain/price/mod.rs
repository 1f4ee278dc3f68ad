//! Price domain - oracle lookups and fallback prices

mod price_book;
mod price_feed;

pub use price_book::{PriceBook, UNKNOWN_TOKEN_PRICE};
pub use price_feed::{OfflineOracle, PriceOracle};
