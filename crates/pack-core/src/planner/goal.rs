use super::fits;
use crate::ingest::non_negative;
use crate::model::{CatalogItem, EnrichedPack};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq)]
pub struct GoalRequest {
    pub target_text: String,
    pub target_quantity: f64,
    pub budget: Option<f64>,
    pub include_reference: bool,
}

impl GoalRequest {
    pub fn new(target_text: impl Into<String>, target_quantity: f64) -> Self {
        Self {
            target_text: target_text.into(),
            target_quantity: non_negative(target_quantity),
            budget: None,
            include_reference: false,
        }
    }

    pub fn budget(mut self, budget: Option<f64>) -> Self {
        self.budget = budget.map(non_negative);
        self
    }

    pub fn include_reference(mut self, include: bool) -> Self {
        self.include_reference = include;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// The target text matched nothing in the item catalog.
    NoMatchingItems,
    /// Items matched, but no eligible pack supplies them.
    NoCandidates,
    Reached,
    NotReached,
}

impl GoalStatus {
    /// Sentence shown to the user for this outcome.
    pub const fn message(self) -> &'static str {
        match self {
            GoalStatus::NoMatchingItems => "No items match that target text.",
            GoalStatus::NoCandidates => "No packs contain the target item.",
            GoalStatus::Reached => "Target reached.",
            GoalStatus::NotReached => "Target not fully reached with current budget/candidates.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSelection {
    pub pack: EnrichedPack,
    pub quantity: f64,
    pub price: f64,
    pub cost_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPlan {
    pub selected: Vec<GoalSelection>,
    pub target_quantity: f64,
    pub budget: Option<f64>,
    pub spent: f64,
    pub total_quantity: f64,
    pub effective_cost_per_unit: Option<f64>,
    pub reached: bool,
    pub remaining_budget: Option<f64>,
    pub considered: usize,
    pub excluded: usize,
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalSummary {
    pub target_amount_requested: f64,
    pub target_amount_obtained: f64,
    pub budget: Option<f64>,
    pub total_spent: f64,
    pub remaining_budget: Option<f64>,
    pub effective_cost_per_unit: Option<f64>,
    pub reached: bool,
    pub status: GoalStatus,
    pub considered: usize,
    pub excluded: usize,
}

impl GoalPlan {
    fn empty(request: &GoalRequest, excluded: usize, status: GoalStatus) -> Self {
        Self {
            selected: Vec::new(),
            target_quantity: request.target_quantity,
            budget: request.budget,
            spent: 0.0,
            total_quantity: 0.0,
            effective_cost_per_unit: None,
            reached: false,
            remaining_budget: request.budget,
            considered: 0,
            excluded,
            status,
        }
    }

    pub fn summary(&self) -> GoalSummary {
        GoalSummary {
            target_amount_requested: self.target_quantity,
            target_amount_obtained: self.total_quantity,
            budget: self.budget,
            total_spent: self.spent,
            remaining_budget: self.remaining_budget,
            effective_cost_per_unit: self.effective_cost_per_unit,
            reached: self.reached,
            status: self.status,
            considered: self.considered,
            excluded: self.excluded,
        }
    }
}

/// Identities of catalog items whose name contains `target_text`,
/// case-insensitively. Blank text matches nothing.
pub fn matching_item_ids<'a>(items: &'a [CatalogItem], target_text: &str) -> HashSet<&'a str> {
    let term = target_text.trim().to_lowercase();
    if term.is_empty() {
        return HashSet::new();
    }
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&term))
        .map(CatalogItem::identity)
        .collect()
}

/// Greedily buy the cheapest-per-unit packs until `target_quantity` of the
/// matched item is reached, the candidates run out, or the budget is spent.
///
/// Candidates need a positive price and a positive quantity of the target.
/// When a budget is set, a candidate that would overshoot it is skipped; the
/// scan stops as soon as the target is met.
pub fn plan_goal(packs: &[EnrichedPack], items: &[CatalogItem], request: &GoalRequest) -> GoalPlan {
    let matching = matching_item_ids(items, &request.target_text);
    if matching.is_empty() {
        return GoalPlan::empty(request, packs.len(), GoalStatus::NoMatchingItems);
    }

    let mut candidates: Vec<(&EnrichedPack, f64, f64)> = packs
        .iter()
        .filter(|pack| request.include_reference || !pack.is_reference())
        .filter_map(|pack| {
            let quantity = target_quantity_in(pack, &matching);
            let price = pack.price_amount();
            (quantity > 0.0 && price > 0.0).then_some((pack, quantity, price))
        })
        .collect();

    if candidates.is_empty() {
        return GoalPlan::empty(request, packs.len(), GoalStatus::NoCandidates);
    }

    candidates.sort_by(|(_, qa, pa), (_, qb, pb)| {
        (pa / qa).partial_cmp(&(pb / qb)).unwrap_or(Ordering::Equal)
    });

    let mut selected = Vec::new();
    let mut spent = 0.0;
    let mut total_quantity = 0.0;
    for (pack, quantity, price) in &candidates {
        if let Some(budget) = request.budget {
            if !fits(spent, *price, budget) {
                continue;
            }
        }
        spent += price;
        total_quantity += quantity;
        selected.push(GoalSelection {
            pack: (*pack).clone(),
            quantity: *quantity,
            price: *price,
            cost_per_unit: price / quantity,
        });
        if total_quantity >= request.target_quantity {
            break;
        }
    }

    let reached = total_quantity >= request.target_quantity;
    let considered = candidates.len();

    event!(
        target: "pack_core::planner::goal",
        Level::DEBUG,
        item = %request.target_text,
        matched_items = matching.len(),
        considered,
        spent,
        total_quantity,
        reached,
    );

    GoalPlan {
        selected,
        target_quantity: request.target_quantity,
        budget: request.budget,
        spent,
        total_quantity,
        effective_cost_per_unit: (total_quantity > 0.0).then(|| spent / total_quantity),
        reached,
        remaining_budget: request.budget.map(|budget| budget - spent),
        considered,
        excluded: packs.len() - considered,
        status: if reached {
            GoalStatus::Reached
        } else {
            GoalStatus::NotReached
        },
    }
}

fn target_quantity_in(pack: &EnrichedPack, matching: &HashSet<&str>) -> f64 {
    pack.pack
        .items
        .iter()
        .filter(|item| matching.contains(item.identity()))
        .map(|item| item.quantity)
        .sum()
}
