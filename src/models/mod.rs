pub mod asset;
pub mod group;
pub mod price_point;
pub mod stats;
pub mod timeline;
pub mod transaction;

pub use asset::{Asset, AssetCategory};
pub use group::AssetGroup;
pub use price_point::PricePoint;
pub use stats::PortfolioStats;
pub use timeline::TimelinePoint;
pub use transaction::{Transaction, TransactionType};
