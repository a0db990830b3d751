use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, event};

use pack_core::compare::{Comparison, ComparisonSet};
use pack_core::ingest::parse_amount;
use pack_core::model::EnrichedPack;
use pack_core::planner::{BudgetRequest, GoalRequest, GoalStatus, plan_budget, plan_goal};
use pack_core::{EngineInfo, FilterSpec, SortDirection, SortField, apply_filters, apply_profile};
use pack_planner::config::{PlannerConfig, PresetConfig, PresetKind};
use pack_planner::export::{BudgetExport, GoalExport, render_json};
use pack_planner::logging::init_logging;
use pack_planner::site::SiteData;

/// Explore ranked packs and plan purchases from exported site data.
#[derive(Debug, Parser)]
#[command(
    name = "packplan",
    author,
    version,
    about = "Pack ranking explorer and purchase planner"
)]
struct Cli {
    /// Path to the YAML configuration file (defaults to ./packplan.yaml when present).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the site-data directory.
    #[arg(long, value_name = "DIR")]
    site_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List packs after filtering and sorting.
    List(ListArgs),
    /// Compare up to three packs side by side; later ids evict earlier ones.
    Compare {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,
        /// Player profile used for the profile score row.
        #[arg(long)]
        profile: Option<String>,
    },
    /// Fill a budget with the best value-per-dollar packs.
    Budget(BudgetArgs),
    /// Reach a target amount of one item as cheaply as possible.
    Goal(GoalArgs),
    /// Run a preset from the configuration.
    Preset { key: String },
    /// List configured presets.
    Presets,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive substring of the pack name.
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    exclude_reference: bool,
    /// Only packs ranked in this category.
    #[arg(long)]
    category: Option<String>,
    /// rank_overall, value_per_dollar or price.
    #[arg(long, default_value = "rank_overall")]
    sort: String,
    /// "asc" sorts ascending; anything else descending.
    #[arg(long, default_value = "asc")]
    dir: String,
    #[arg(long, value_name = "N")]
    top: Option<String>,
    #[arg(long)]
    profile: Option<String>,
}

#[derive(Debug, Args)]
struct BudgetArgs {
    #[arg(long, value_name = "AMOUNT")]
    budget: String,
    /// Currency label, for display only.
    #[arg(long, default_value = "USD")]
    currency: String,
    #[arg(long)]
    include_reference: bool,
    #[arg(long, value_name = "N")]
    max_count: Option<usize>,
    #[arg(long)]
    profile: Option<String>,
    /// Print the plan as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct GoalArgs {
    /// Target item name (substring match).
    #[arg(long)]
    target: String,
    #[arg(long, value_name = "AMOUNT")]
    amount: String,
    #[arg(long, value_name = "AMOUNT")]
    budget: Option<String>,
    #[arg(long, default_value = "USD")]
    currency: String,
    #[arg(long)]
    include_reference: bool,
    #[arg(long)]
    profile: Option<String>,
    /// Print the plan as JSON instead of text.
    #[arg(long)]
    json: bool,
}

struct BudgetJob {
    budget: f64,
    currency: String,
    include_reference: bool,
    max_count: Option<usize>,
    profile: Option<String>,
    json: bool,
}

struct GoalJob {
    target: String,
    amount: f64,
    budget: Option<f64>,
    currency: String,
    include_reference: bool,
    profile: Option<String>,
    json: bool,
}

impl From<BudgetArgs> for BudgetJob {
    fn from(args: BudgetArgs) -> Self {
        Self {
            budget: parse_amount(&args.budget),
            currency: args.currency,
            include_reference: args.include_reference,
            max_count: args.max_count,
            profile: args.profile,
            json: args.json,
        }
    }
}

impl From<GoalArgs> for GoalJob {
    fn from(args: GoalArgs) -> Self {
        Self {
            target: args.target,
            amount: parse_amount(&args.amount),
            budget: args.budget.as_deref().map(parse_amount),
            currency: args.currency,
            include_reference: args.include_reference,
            profile: args.profile,
            json: args.json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = PlannerConfig::load(cli.config.as_deref())?;

    if let Some(site_dir) = cli.site_dir {
        config.site_dir = site_dir;
        config.validate()?;
    }

    let _logging_guard = init_logging(&config.logging)?;
    event!(
        target: "packplan",
        Level::INFO,
        version = EngineInfo::version(),
        site_dir = %config.site_dir,
    );

    match cli.command {
        Command::Presets => {
            print_presets(&config);
            Ok(())
        }
        Command::List(args) => {
            let site = load_site(&config)?;
            run_list(&config, &site, args)
        }
        Command::Compare { ids, profile } => {
            let site = load_site(&config)?;
            run_compare(&config, &site, &ids, profile.as_deref());
            Ok(())
        }
        Command::Budget(args) => {
            let site = load_site(&config)?;
            run_budget(&config, &site, args.into())
        }
        Command::Goal(args) => {
            let site = load_site(&config)?;
            run_goal(&config, &site, args.into())
        }
        Command::Preset { key } => {
            let preset = config
                .preset(&key)
                .ok_or_else(|| anyhow!("unknown preset '{key}'; run `packplan presets`"))?
                .clone();
            let site = load_site(&config)?;
            println!("Preset: {} ({})", preset.label(), preset.kind.as_str());
            match preset.kind {
                PresetKind::Budget => run_budget(&config, &site, budget_job(&preset)),
                PresetKind::Goal => run_goal(&config, &site, goal_job(&preset)),
            }
        }
    }
}

fn load_site(config: &PlannerConfig) -> anyhow::Result<SiteData> {
    SiteData::load(&config.site_dir)
        .with_context(|| format!("loading site data from {}", config.site_dir))
}

fn budget_job(preset: &PresetConfig) -> BudgetJob {
    BudgetJob {
        budget: preset.budget.unwrap_or(0.0),
        currency: preset.currency.clone().unwrap_or_else(|| "USD".to_string()),
        include_reference: preset.include_reference,
        max_count: preset.max_count,
        profile: preset.profile.clone(),
        json: false,
    }
}

fn goal_job(preset: &PresetConfig) -> GoalJob {
    GoalJob {
        target: preset.target_name.clone().unwrap_or_default(),
        amount: preset.target_amount.unwrap_or(0.0),
        budget: preset.budget,
        currency: preset.currency.clone().unwrap_or_else(|| "USD".to_string()),
        include_reference: preset.include_reference,
        profile: preset.profile.clone(),
        json: false,
    }
}

fn print_presets(config: &PlannerConfig) {
    if config.presets.is_empty() {
        println!("No presets configured.");
        return;
    }
    for preset in &config.presets {
        println!("{}  [{}]  {}", preset.key, preset.kind.as_str(), preset.label());
        if let Some(description) = preset.description.as_deref() {
            println!("    {description}");
        }
    }
}

fn run_list(config: &PlannerConfig, site: &SiteData, args: ListArgs) -> anyhow::Result<()> {
    let sort_field = SortField::from_str(&args.sort).ok_or_else(|| {
        anyhow!(
            "unknown sort field '{}'; expected rank_overall, value_per_dollar or price",
            args.sort
        )
    })?;

    let mut spec = FilterSpec::default()
        .with_search(args.search.trim())
        .sorted_by(sort_field, SortDirection::from_label(&args.dir));
    if args.exclude_reference {
        spec = spec.excluding_reference();
    }
    if let Some(category) = args.category.as_deref() {
        spec = spec.focus(category.trim());
    }
    if let Some(top) = args.top.as_deref() {
        spec = spec.top(parse_amount(top) as usize);
    }

    let mut packs = site.packs();
    if let Some(name) = args.profile.as_deref() {
        packs = apply_profile(&packs, config.profile_book().get(Some(name)));
    }

    let focus = spec.focus_category.as_deref().filter(|c| !c.is_empty());
    let listed = apply_filters(&packs, &spec);
    for pack in &listed {
        let mut line = format!(
            "#{:<4} {}  {}  VPD {:.2}",
            format_rank(pack.rank_overall),
            pack.name(),
            format_price(pack),
            pack.value_per_dollar
        );
        if let Some(score) = pack.profile_score() {
            line.push_str(&format!("  profile {score:.2}"));
        }
        if pack.is_reference() {
            line.push_str("  [reference]");
        }
        if let Some(category) = focus {
            if let Some(score) = pack.category_score(category) {
                line.push_str(&format!("  [{category} rank #{}]", format_rank(score.rank)));
            }
        }
        println!("{line}");
    }
    println!("{} of {} packs", listed.len(), packs.len());
    Ok(())
}

fn run_compare(config: &PlannerConfig, site: &SiteData, ids: &[String], profile: Option<&str>) {
    let selection = ids
        .iter()
        .fold(ComparisonSet::new(), |set, id| set.select(id.trim()));

    let mut packs = site.packs();
    if profile.is_some() {
        packs = apply_profile(&packs, config.profile_book().get(profile));
    }

    let Some(comparison) = Comparison::build(&selection, &packs) else {
        println!("Select at least two known packs to compare.");
        return;
    };

    let mut rows: Vec<(&str, Vec<String>)> = vec![
        ("Pack", comparison.rows.iter().map(|r| r.name.clone()).collect()),
        (
            "Price",
            comparison
                .rows
                .iter()
                .map(|r| format!("{:.2} {}", r.price, r.currency).trim_end().to_string())
                .collect(),
        ),
        (
            "Total value",
            comparison.rows.iter().map(|r| format!("{:.0}", r.total_value)).collect(),
        ),
        (
            "Value per dollar",
            comparison
                .rows
                .iter()
                .map(|r| format!("{:.2}", r.value_per_dollar))
                .collect(),
        ),
        (
            "Rank overall",
            comparison.rows.iter().map(|r| format_rank(r.rank_overall)).collect(),
        ),
        (
            "Top categories",
            comparison
                .rows
                .iter()
                .map(|r| {
                    r.highlights
                        .iter()
                        .map(|h| format!("{}: #{} ({:.1})", h.category, format_rank(h.rank), h.score))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .collect(),
        ),
    ];
    if comparison.has_profile_score {
        rows.insert(
            4,
            (
                "Profile score",
                comparison
                    .rows
                    .iter()
                    .map(|r| r.profile_score.map_or("n/a".to_string(), |s| format!("{s:.2}")))
                    .collect(),
            ),
        );
    }

    for (label, values) in rows {
        println!("{label:<18}| {}", values.join(" | "));
    }
}

fn run_budget(config: &PlannerConfig, site: &SiteData, job: BudgetJob) -> anyhow::Result<()> {
    if job.budget <= 0.0 {
        bail!("Budget must be greater than 0.");
    }

    let book = config.profile_book();
    let profile = book.get(job.profile.as_deref());
    let packs = apply_profile(&site.packs(), profile);
    let request = BudgetRequest::new(job.budget)
        .include_reference(job.include_reference)
        .max_count(job.max_count);
    let plan = plan_budget(&packs, &request);

    if job.json {
        print!(
            "{}",
            render_json(&BudgetExport::new(&plan, &profile.name, &job.currency))?
        );
        return Ok(());
    }

    println!(
        "Budget planner (profile: {}, currency: {})",
        profile.name, job.currency
    );
    println!("Budget: {:.2}", plan.budget);
    println!(
        "Packs considered: {}, excluded: {}",
        plan.considered, plan.excluded
    );
    if plan.selected.is_empty() {
        println!("No packs selected within budget.");
    } else {
        println!("Selected packs:");
        for (idx, pack) in plan.selected.iter().enumerate() {
            println!(
                "  {}) {} - price: {:.2}, value: {:.2}, value_per_dollar: {:.2}, rank: {}",
                idx + 1,
                pack.name(),
                pack.price_amount(),
                pack.pack.value,
                pack.value_per_dollar,
                format_rank(pack.rank_overall)
            );
        }
    }
    println!("Total spent: {:.2}", plan.spent);
    println!("Remaining budget: {:.2}", plan.remaining_budget);
    println!("Total value: {:.2}", plan.total_value);
    println!(
        "Effective value_per_dollar: {:.2}",
        plan.effective_value_per_dollar
    );
    Ok(())
}

fn run_goal(config: &PlannerConfig, site: &SiteData, job: GoalJob) -> anyhow::Result<()> {
    let target = job.target.trim();
    if target.is_empty() || job.amount <= 0.0 {
        bail!("Target and amount are required (amount must be > 0).");
    }

    let book = config.profile_book();
    let profile = book.get(job.profile.as_deref());
    let packs = apply_profile(&site.packs(), profile);
    let request = GoalRequest::new(target, job.amount)
        .budget(job.budget)
        .include_reference(job.include_reference);
    let plan = plan_goal(&packs, site.items(), &request);
    if plan.status == GoalStatus::NoMatchingItems {
        event!(target: "packplan", Level::WARN, item = target, "goal target matched no catalog items");
    }

    if job.json {
        print!(
            "{}",
            render_json(&GoalExport::new(&plan, target, &profile.name, &job.currency))?
        );
        return Ok(());
    }

    println!("Goal planner");
    println!("  Target item: {target}");
    println!("  Requested amount: {}", plan.target_quantity);
    match plan.budget {
        Some(budget) => println!("  Budget: {budget:.2} {}", job.currency),
        None => println!("  Budget: None"),
    }
    println!("  Profile: {}", profile.name);
    println!(
        "  Packs considered: {}, excluded: {}",
        plan.considered, plan.excluded
    );
    if plan.selected.is_empty() {
        println!("No packs selected.");
    } else {
        println!("Selected packs:");
        for (idx, selection) in plan.selected.iter().enumerate() {
            println!(
                "  {}) {} - price: {:.2}, target qty: {:.2}, cost/unit: {:.4}",
                idx + 1,
                selection.pack.name(),
                selection.price,
                selection.quantity,
                selection.cost_per_unit
            );
        }
    }
    println!("Summary:");
    println!("  Total target amount from plan: {}", plan.total_quantity);
    println!("  Total spent: {:.2}", plan.spent);
    if let Some(remaining) = plan.remaining_budget {
        println!("  Remaining budget: {remaining:.2}");
    }
    if let Some(cpu) = plan.effective_cost_per_unit {
        println!("  Effective cost per unit (target): {cpu:.4} {}", job.currency);
    }
    println!("  Status: {}", plan.status.message());
    Ok(())
}

fn format_rank(rank: Option<u32>) -> String {
    rank.map_or_else(|| "?".to_string(), |r| r.to_string())
}

fn format_price(pack: &EnrichedPack) -> String {
    format!("{:.2} {}", pack.price_amount(), pack.currency())
        .trim_end()
        .to_string()
}
