use std::fs;
use std::path::Path;

pub const PACKS: &str = r#"{
  "packs": [
    {"id": "A", "name": "Shard Starter", "price": {"amount": 10, "currency": "USD"}, "value": 50,
     "items": [{"name": "Hero Shard", "quantity": 2, "category": "shards", "value": 30}]},
    {"id": "B", "name": "Gem Chest", "price": {"amount": "30", "currency": "USD"}, "value": 90,
     "items": [{"name": "Gems", "quantity": 900, "category": "gems", "value": 90}]},
    {"id": "C", "name": "Shard Sampler", "price": 5, "value": 40,
     "items": [{"name": "Hero Shard", "quantity": 3, "category": "shards", "value": 40}]},
    {"id": "R", "name": "Reference Bundle", "price": {"amount": 1, "currency": "USD"}, "value": 100,
     "is_reference": true, "items": [{"name": "Hero Shard", "quantity": 50}]}
  ]
}"#;

pub const OVERALL: &str = r#"{
  "packs": [
    {"id": "R", "rank_overall": 1, "value_per_dollar": 100},
    {"id": "C", "rank_overall": 2, "value_per_dollar": 8},
    {"id": "A", "rank_overall": 3, "value_per_dollar": 5},
    {"id": "B", "rank_overall": 4, "value_per_dollar": 3}
  ]
}"#;

pub const BY_CATEGORY: &str = r#"{
  "by_category": {
    "shards": [{"id": "C", "score": 40, "rank": 1}, {"id": "A", "score": 30, "rank": 2}],
    "gems": [{"id": "B", "score": 90, "rank": 1}]
  }
}"#;

pub const ITEMS: &str = r#"{
  "items": [
    {"name": "Hero Shard", "category": "shards"},
    {"name": "Gems", "category": "gems"},
    {"name": "Speedup", "category": "speedups"}
  ]
}"#;

pub fn write_site(dir: &Path) {
    fs::create_dir_all(dir).expect("site dir");
    fs::write(dir.join("packs.json"), PACKS).expect("write packs");
    fs::write(dir.join("pack_ranking_overall.json"), OVERALL).expect("write overall");
    fs::write(dir.join("pack_ranking_by_category.json"), BY_CATEGORY).expect("write categories");
    fs::write(dir.join("items.json"), ITEMS).expect("write items");
}
