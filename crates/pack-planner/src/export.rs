//! JSON rendering of planner results for machine-readable output.

use pack_core::model::EnrichedPack;
use pack_core::planner::{BudgetPlan, BudgetSummary, GoalPlan, GoalSummary};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlannedPack<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub price: f64,
    pub currency: &'a str,
    pub total_value: f64,
    pub value_per_dollar: f64,
    pub rank_overall: Option<u32>,
    pub profile_score: Option<f64>,
}

impl<'a> From<&'a EnrichedPack> for PlannedPack<'a> {
    fn from(pack: &'a EnrichedPack) -> Self {
        Self {
            id: pack.id(),
            name: pack.name(),
            price: pack.price_amount(),
            currency: pack.currency(),
            total_value: pack.pack.value,
            value_per_dollar: pack.value_per_dollar,
            rank_overall: pack.rank_overall,
            profile_score: pack.profile_score(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BudgetExport<'a> {
    pub profile: &'a str,
    pub currency: &'a str,
    pub summary: BudgetSummary,
    pub packs: Vec<PlannedPack<'a>>,
}

impl<'a> BudgetExport<'a> {
    pub fn new(plan: &'a BudgetPlan, profile: &'a str, currency: &'a str) -> Self {
        Self {
            profile,
            currency,
            summary: plan.summary(),
            packs: plan.selected.iter().map(PlannedPack::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GoalTarget<'a> {
    pub name: &'a str,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct GoalPack<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub price: f64,
    pub target_quantity: f64,
    pub cost_per_unit: f64,
    pub rank_overall: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GoalExport<'a> {
    pub profile: &'a str,
    pub currency: &'a str,
    pub target: GoalTarget<'a>,
    pub summary: GoalSummary,
    pub selected_packs: Vec<GoalPack<'a>>,
}

impl<'a> GoalExport<'a> {
    pub fn new(plan: &'a GoalPlan, target: &'a str, profile: &'a str, currency: &'a str) -> Self {
        Self {
            profile,
            currency,
            target: GoalTarget {
                name: target,
                amount: plan.target_quantity,
            },
            summary: plan.summary(),
            selected_packs: plan
                .selected
                .iter()
                .map(|selection| GoalPack {
                    id: selection.pack.id(),
                    name: selection.pack.name(),
                    price: selection.price,
                    target_quantity: selection.quantity,
                    cost_per_unit: selection.cost_per_unit,
                    rank_overall: selection.pack.rank_overall,
                })
                .collect(),
        }
    }
}

/// Pretty JSON with a trailing newline.
pub fn render_json<T: Serialize>(payload: &T) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(payload)?;
    text.push('\n');
    Ok(text)
}
