//! Parsing of the four site exports into one in-memory catalog.
//!
//! Only the packs document is required. Ranking and item documents may be
//! absent, in which case the catalog behaves as if they were empty.

use crate::merge::merge_rankings;
use crate::model::{CatalogItem, EnrichedPack, OverallRankingEntry, Pack, RankingByCategory};
use crate::{ingest, model};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Packs,
    OverallRanking,
    CategoryRanking,
    Items,
}

impl DocumentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Packs => "packs",
            DocumentKind::OverallRanking => "overall ranking",
            DocumentKind::CategoryRanking => "category ranking",
            DocumentKind::Items => "items",
        }
    }
}

#[derive(Debug)]
pub struct CatalogError {
    pub kind: DocumentKind,
    pub source: serde_json::Error,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed {} document: {}", self.kind.as_str(), self.source)
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Default, Deserialize)]
struct PacksDocument {
    #[serde(default, deserialize_with = "ingest::list")]
    packs: Vec<Pack>,
}

#[derive(Debug, Default, Deserialize)]
struct OverallRankingDocument {
    #[serde(default, deserialize_with = "ingest::list")]
    packs: Vec<OverallRankingEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct CategoryRankingDocument {
    #[serde(
        default,
        alias = "byCategory",
        deserialize_with = "model::ranking::category_lists"
    )]
    by_category: RankingByCategory,
}

#[derive(Debug, Default, Deserialize)]
struct ItemsDocument {
    #[serde(default, deserialize_with = "ingest::list")]
    items: Vec<CatalogItem>,
}

fn parse<T>(kind: DocumentKind, json: &str) -> Result<T, CatalogError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(json).map_err(|source| CatalogError { kind, source })
}

fn parse_optional<T>(kind: DocumentKind, json: Option<&str>) -> Result<T, CatalogError>
where
    T: DeserializeOwned + Default,
{
    json.map_or_else(|| Ok(T::default()), |json| parse(kind, json))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub packs: Vec<Pack>,
    pub items: Vec<CatalogItem>,
    pub overall: Vec<OverallRankingEntry>,
    pub by_category: RankingByCategory,
}

impl Catalog {
    pub fn from_json(
        packs: &str,
        overall: Option<&str>,
        by_category: Option<&str>,
        items: Option<&str>,
    ) -> Result<Self, CatalogError> {
        let packs: PacksDocument = parse(DocumentKind::Packs, packs)?;
        let overall: OverallRankingDocument =
            parse_optional(DocumentKind::OverallRanking, overall)?;
        let by_category: CategoryRankingDocument =
            parse_optional(DocumentKind::CategoryRanking, by_category)?;
        let items: ItemsDocument = parse_optional(DocumentKind::Items, items)?;
        Ok(Self {
            packs: packs.packs,
            items: items.items,
            overall: overall.packs,
            by_category: by_category.by_category,
        })
    }

    pub fn enriched(&self) -> Vec<EnrichedPack> {
        merge_rankings(&self.packs, &self.overall, &self.by_category)
    }

    /// Category names that carry a ranking list, in sorted order.
    pub fn categories(&self) -> Vec<&str> {
        self.by_category.keys().map(String::as_str).collect()
    }
}
