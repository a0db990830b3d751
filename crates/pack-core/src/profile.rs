//! Persona-weighted scoring.
//!
//! A profile weights item categories; a pack's profile score is its weighted
//! category value per unit of currency. Profiles without weights fall back
//! to the plain value per dollar.

use crate::model::{EnrichedPack, Pack};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PROFILE: &str = "default";
const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn baseline() -> Self {
        Self {
            name: DEFAULT_PROFILE.to_string(),
            description: "Baseline profile".to_string(),
            weights: BTreeMap::new(),
        }
    }

    pub fn with_weight(mut self, category: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(category.into(), weight);
        self
    }

    pub fn score(&self, pack: &EnrichedPack) -> f64 {
        if self.weights.is_empty() {
            return pack.value_per_dollar;
        }
        let price = pack.price_amount();
        if price <= 0.0 {
            return 0.0;
        }
        let values = category_values(&pack.pack);
        let weighted: f64 = self
            .weights
            .iter()
            .map(|(category, weight)| weight * values.get(category).copied().unwrap_or(0.0))
            .sum();
        weighted / price
    }
}

/// Sum of item values per item category.
pub fn category_values(pack: &Pack) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for item in &pack.items {
        let category = item.category.as_deref().unwrap_or(UNKNOWN_CATEGORY);
        *totals.entry(category.to_string()).or_insert(0.0) += item.value;
    }
    totals
}

/// Copy of `packs` with every `profile_score` computed under `profile`.
pub fn apply_profile(packs: &[EnrichedPack], profile: &PlayerProfile) -> Vec<EnrichedPack> {
    packs
        .iter()
        .map(|pack| {
            let mut scored = pack.clone();
            scored.pack.profile_score = Some(profile.score(pack));
            scored
        })
        .collect()
}

/// Named profiles with a guaranteed default entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileBook {
    profiles: BTreeMap<String, PlayerProfile>,
}

impl ProfileBook {
    pub fn new(profiles: impl IntoIterator<Item = PlayerProfile>) -> Self {
        let mut map: BTreeMap<String, PlayerProfile> = profiles
            .into_iter()
            .map(|profile| (profile.name.clone(), profile))
            .collect();
        map.entry(DEFAULT_PROFILE.to_string())
            .or_insert_with(PlayerProfile::baseline);
        Self { profiles: map }
    }

    /// Unknown or empty names resolve to the default profile.
    pub fn get(&self, name: Option<&str>) -> &PlayerProfile {
        name.map(str::trim)
            .filter(|name| !name.is_empty())
            .and_then(|name| self.profiles.get(name))
            .unwrap_or_else(|| &self.profiles[DEFAULT_PROFILE])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

impl Default for ProfileBook {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_rankings;
    use crate::model::{Item, OverallRankingEntry, Price, RankingByCategory};

    fn enriched(pack: Pack, vpd: f64) -> EnrichedPack {
        let overall = vec![OverallRankingEntry::new(pack.id.clone(), 1, vpd)];
        merge_rankings(&[pack], &overall, &RankingByCategory::new()).remove(0)
    }

    #[test]
    fn weighted_score_divides_by_price() {
        let pack = Pack::new("a", "A", Price::new(10.0, "USD"), 70.0).with_items(vec![
            Item::new("Shard", 5.0).with_category("shard", 50.0),
            Item::new("VIP", 1.0).with_category("vip", 20.0),
        ]);
        let profile = PlayerProfile::new("f2p")
            .with_weight("shard", 1.0)
            .with_weight("vip", 0.5);
        let score = profile.score(&enriched(pack, 5.0));
        assert!((score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn empty_weights_fall_back_to_value_per_dollar() {
        let pack = Pack::new("a", "A", Price::new(10.0, "USD"), 70.0);
        assert_eq!(PlayerProfile::baseline().score(&enriched(pack, 7.0)), 7.0);
    }

    #[test]
    fn free_packs_score_zero_under_weights() {
        let pack = Pack::new("a", "A", Price::default(), 70.0)
            .with_items(vec![Item::new("Shard", 1.0).with_category("shard", 70.0)]);
        let profile = PlayerProfile::new("f2p").with_weight("shard", 1.0);
        assert_eq!(profile.score(&enriched(pack, 0.0)), 0.0);
    }

    #[test]
    fn uncategorized_items_count_as_unknown() {
        let mut item = Item::new("Mystery", 1.0);
        item.value = 4.0;
        let pack = Pack::new("a", "A", Price::new(1.0, ""), 4.0).with_items(vec![item]);
        assert_eq!(category_values(&pack).get("unknown"), Some(&4.0));
    }

    #[test]
    fn apply_profile_sets_scores() {
        let packs = vec![enriched(Pack::new("a", "A", Price::new(2.0, ""), 8.0), 4.0)];
        let scored = apply_profile(&packs, &PlayerProfile::baseline());
        assert_eq!(scored[0].profile_score(), Some(4.0));
        assert_eq!(packs[0].profile_score(), None);
    }

    #[test]
    fn profile_book_falls_back_to_default() {
        let book = ProfileBook::new(vec![PlayerProfile::new("whale").with_weight("vip", 1.0)]);
        assert_eq!(book.get(Some("whale")).name, "whale");
        assert_eq!(book.get(Some("unknown")).name, DEFAULT_PROFILE);
        assert_eq!(book.get(None).name, DEFAULT_PROFILE);
        assert_eq!(book.names().collect::<Vec<_>>(), vec!["default", "whale"]);
    }
}
