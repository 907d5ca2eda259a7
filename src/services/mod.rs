pub mod accounts;
pub mod catalog;
pub mod favorites;
pub mod watches;

pub use accounts::{Accounts, LoginOutcome};
pub use catalog::Catalog;
pub use favorites::FavoritesLedger;
pub use watches::WatchLedger;
