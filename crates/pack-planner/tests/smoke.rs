mod common;

use std::fs;
use std::path::Path;

use pack_core::apply_profile;
use pack_core::planner::{BudgetRequest, GoalRequest, GoalStatus, plan_budget, plan_goal};
use pack_planner::config::PlannerConfig;
use pack_planner::export::{BudgetExport, GoalExport, render_json};
use pack_planner::site::SiteData;
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn load_config(root: &Path) -> PlannerConfig {
    let yaml = format!(
        r#"
site_dir: "{site}"
profiles:
  collector:
    description: "Shard collector"
    weights:
      shards: 1.0
presets:
  - key: "starter"
    kind: budget
    budget: 15
logging:
  enable_structured: false
"#,
        site = root.join("site").display()
    );
    let path = root.join("packplan.yaml");
    fs::write(&path, yaml).expect("write config");
    PlannerConfig::from_path(&path).expect("config loads")
}

fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[test]
fn budget_export_is_deterministic() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path());
    common::write_site(Path::new(&config.site_dir));

    let site = SiteData::load(&config.site_dir).expect("site loads");
    let book = config.profile_book();
    let profile = book.get(Some("collector"));

    let mut renders = Vec::new();
    for _ in 0..2 {
        let packs = apply_profile(&site.packs(), profile);
        let plan = plan_budget(&packs, &BudgetRequest::new(15.0));
        assert_eq!(plan.selected.len(), 2);
        assert_eq!(plan.spent, 15.0);
        assert_eq!(plan.total_value, 90.0);
        renders.push(render_json(&BudgetExport::new(&plan, &profile.name, "USD")).expect("render"));
    }

    assert_eq!(digest(&renders[0]), digest(&renders[1]));

    let exported: serde_json::Value = serde_json::from_str(&renders[0]).expect("export is json");
    assert_eq!(exported["profile"], "collector");
    assert_eq!(exported["packs"][0]["id"], "C");
    assert_eq!(exported["packs"][1]["id"], "A");
    assert_eq!(exported["summary"]["effective_value_per_dollar"], 6.0);
}

#[test]
fn goal_plan_reaches_target_from_site_data() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path());
    common::write_site(Path::new(&config.site_dir));
    let site = SiteData::load(&config.site_dir).expect("site loads");

    let plan = plan_goal(&site.packs(), site.items(), &GoalRequest::new("hero shard", 4.0));
    let ids: Vec<&str> = plan.selected.iter().map(|s| s.pack.id()).collect();
    assert_eq!(ids, vec!["C", "A"]);
    assert_eq!(plan.status, GoalStatus::Reached);
    assert_eq!(plan.total_quantity, 5.0);
    assert_eq!(plan.spent, 15.0);

    let text = render_json(&GoalExport::new(&plan, "hero shard", "default", "USD")).expect("render");
    let exported: serde_json::Value = serde_json::from_str(&text).expect("export is json");
    assert_eq!(exported["target"]["name"], "hero shard");
    assert_eq!(exported["summary"]["reached"], true);
    assert_eq!(exported["summary"]["status"], "reached");
    assert_eq!(exported["selected_packs"][0]["cost_per_unit"], 5.0 / 3.0);
}

#[test]
fn preset_and_categories_come_from_config_and_site() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path());
    common::write_site(Path::new(&config.site_dir));
    let site = SiteData::load(&config.site_dir).expect("site loads");

    assert_eq!(config.preset("starter").and_then(|p| p.budget), Some(15.0));
    assert_eq!(site.catalog.categories(), vec!["gems", "shards"]);
}
