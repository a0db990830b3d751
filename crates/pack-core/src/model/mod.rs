pub mod item;
pub mod pack;
pub mod ranking;

pub use item::CatalogItem;
pub use pack::{CategoryScore, EnrichedPack, Item, Pack, Price};
pub use ranking::{CategoryRankingEntry, OverallRankingEntry, RankingByCategory};
