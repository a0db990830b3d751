use crate::model::{
    CategoryRankingEntry, CategoryScore, EnrichedPack, OverallRankingEntry, Pack, RankingByCategory,
};
use std::collections::{BTreeMap, HashMap};

/// Combine raw packs with the overall and per-category ranking exports.
///
/// Output order and length match `packs`. Ranking data is advisory: a pack
/// missing from every dataset still comes back with `rank_overall = None`,
/// a value per dollar from its own fields, and no category scores.
///
/// When the overall export lists an id twice the later row wins; within a
/// category list the first matching row wins.
pub fn merge_rankings(
    packs: &[Pack],
    overall: &[OverallRankingEntry],
    by_category: &RankingByCategory,
) -> Vec<EnrichedPack> {
    let overall_by_id: HashMap<&str, &OverallRankingEntry> = overall
        .iter()
        .filter(|entry| !entry.id.is_empty())
        .map(|entry| (entry.id.as_str(), entry))
        .collect();

    let category_index: Vec<(&str, HashMap<&str, &CategoryRankingEntry>)> = by_category
        .iter()
        .map(|(category, entries)| {
            let mut index = HashMap::with_capacity(entries.len());
            for entry in entries.iter().filter(|entry| !entry.id.is_empty()) {
                index.entry(entry.id.as_str()).or_insert(entry);
            }
            (category.as_str(), index)
        })
        .collect();

    packs
        .iter()
        .map(|pack| {
            let overall_entry = overall_by_id.get(pack.id.as_str()).copied();
            enrich(pack, overall_entry, &category_index)
        })
        .collect()
}

fn enrich(
    pack: &Pack,
    overall: Option<&OverallRankingEntry>,
    category_index: &[(&str, HashMap<&str, &CategoryRankingEntry>)],
) -> EnrichedPack {
    let value_per_dollar = overall
        .and_then(|entry| entry.value_per_dollar)
        .or(pack.listed_value_per_dollar)
        .unwrap_or(pack.value);

    let category_scores: BTreeMap<String, CategoryScore> = category_index
        .iter()
        .filter_map(|(category, index)| {
            index.get(pack.id.as_str()).map(|entry| {
                (
                    (*category).to_string(),
                    CategoryScore {
                        score: entry.score,
                        rank: entry.rank,
                    },
                )
            })
        })
        .collect();

    EnrichedPack {
        pack: pack.clone(),
        rank_overall: overall.and_then(|entry| entry.rank_overall),
        value_per_dollar,
        category_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Price, RankingByCategory};

    fn pack(id: &str, value: f64) -> Pack {
        Pack::new(id, format!("Pack {id}"), Price::new(10.0, "USD"), value)
    }

    #[test]
    fn merges_overall_and_category_rankings() {
        let packs = vec![pack("a", 50.0), pack("b", 20.0)];
        let overall = vec![OverallRankingEntry::new("a", 1, 5.0)];
        let mut by_category = RankingByCategory::new();
        by_category.insert(
            "shards".into(),
            vec![
                CategoryRankingEntry::new("b", 80.0, 1),
                CategoryRankingEntry::new("a", 40.0, 2),
            ],
        );
        by_category.insert("speedups".into(), vec![CategoryRankingEntry::new("a", 10.0, 1)]);

        let merged = merge_rankings(&packs, &overall, &by_category);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id(), "a");
        assert_eq!(merged[0].rank_overall, Some(1));
        assert_eq!(merged[0].value_per_dollar, 5.0);
        assert_eq!(merged[0].category_scores.len(), 2);
        assert_eq!(merged[0].category_scores["shards"].rank, Some(2));

        assert_eq!(merged[1].rank_overall, None);
        assert_eq!(merged[1].category_scores.len(), 1);
        assert!(merged[1].category_score("speedups").is_none());
    }

    #[test]
    fn unranked_pack_uses_own_fallback_chain() {
        let listed = pack("x", 30.0).with_listed_value_per_dollar(2.5);
        let bare = pack("y", 30.0);
        let empty = Pack::new("z", "Empty", Price::default(), 0.0);

        let merged = merge_rankings(&[listed, bare, empty], &[], &RankingByCategory::new());
        assert_eq!(merged[0].value_per_dollar, 2.5);
        assert_eq!(merged[1].value_per_dollar, 30.0);
        assert_eq!(merged[2].value_per_dollar, 0.0);
        assert!(merged.iter().all(|p| p.rank_overall.is_none()));
        assert!(merged.iter().all(|p| p.category_scores.is_empty()));
    }

    #[test]
    fn overall_entry_without_vpd_falls_through() {
        let packs = vec![pack("a", 40.0).with_listed_value_per_dollar(4.0)];
        let overall = vec![OverallRankingEntry {
            id: "a".into(),
            rank_overall: Some(3),
            value_per_dollar: None,
        }];
        let merged = merge_rankings(&packs, &overall, &RankingByCategory::new());
        assert_eq!(merged[0].rank_overall, Some(3));
        assert_eq!(merged[0].value_per_dollar, 4.0);
    }

    #[test]
    fn duplicate_rows_resolve_deterministically() {
        let packs = vec![pack("a", 1.0)];
        let overall = vec![
            OverallRankingEntry::new("a", 1, 1.0),
            OverallRankingEntry::new("a", 2, 2.0),
        ];
        let mut by_category = RankingByCategory::new();
        by_category.insert(
            "vip".into(),
            vec![
                CategoryRankingEntry::new("a", 9.0, 1),
                CategoryRankingEntry::new("a", 3.0, 4),
            ],
        );
        let merged = merge_rankings(&packs, &overall, &by_category);
        assert_eq!(merged[0].rank_overall, Some(2));
        assert_eq!(merged[0].category_scores["vip"].score, 9.0);
    }
}
