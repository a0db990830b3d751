use crate::ingest;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One row of the overall ranking export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallRankingEntry {
    #[serde(default, deserialize_with = "ingest::text")]
    pub id: String,
    #[serde(default, deserialize_with = "ingest::opt_rank")]
    pub rank_overall: Option<u32>,
    #[serde(default, deserialize_with = "ingest::opt_number")]
    pub value_per_dollar: Option<f64>,
}

impl OverallRankingEntry {
    pub fn new(id: impl Into<String>, rank_overall: u32, value_per_dollar: f64) -> Self {
        Self {
            id: id.into(),
            rank_overall: Some(rank_overall),
            value_per_dollar: Some(value_per_dollar).filter(|vpd| vpd.is_finite()),
        }
    }
}

/// One row of a per-category ranking list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRankingEntry {
    #[serde(default, deserialize_with = "ingest::text")]
    pub id: String,
    #[serde(default, deserialize_with = "ingest::number")]
    pub score: f64,
    #[serde(default, deserialize_with = "ingest::opt_rank")]
    pub rank: Option<u32>,
}

impl CategoryRankingEntry {
    pub fn new(id: impl Into<String>, score: f64, rank: u32) -> Self {
        Self {
            id: id.into(),
            score,
            rank: Some(rank),
        }
    }
}

/// Category name to its ordered ranking list.
pub type RankingByCategory = BTreeMap<String, Vec<CategoryRankingEntry>>;

pub(crate) fn category_lists<'de, D>(deserializer: D) -> Result<RankingByCategory, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<Vec<Option<CategoryRankingEntry>>>>> =
        Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(category, entries)| {
            let entries = entries.unwrap_or_default().into_iter().flatten().collect();
            (category, entries)
        })
        .collect())
}
