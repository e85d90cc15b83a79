pub mod account;
pub mod bidding;
pub mod listing;
pub mod watchlist;
