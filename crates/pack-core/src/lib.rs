#![deny(warnings)]
pub mod catalog;
pub mod compare;
pub mod filter;
pub mod ingest;
pub mod merge;
pub mod model;
pub mod planner;
pub mod profile;

pub use catalog::{Catalog, CatalogError, DocumentKind};
pub use compare::{Comparison, ComparisonSet};
pub use filter::{FilterSpec, SortDirection, SortField, apply_filters};
pub use merge::merge_rankings;
pub use profile::{PlayerProfile, ProfileBook, apply_profile};

pub struct EngineInfo;

impl EngineInfo {
    pub const fn name() -> &'static str {
        "packplan"
    }

    pub const fn codename() -> &'static str {
        "Pack Explorer"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
