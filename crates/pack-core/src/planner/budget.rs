use super::fits;
use crate::ingest::non_negative;
use crate::model::EnrichedPack;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRequest {
    pub budget: f64,
    pub include_reference: bool,
    pub max_count: Option<usize>,
}

impl BudgetRequest {
    /// Negative or non-finite budgets are treated as zero.
    pub fn new(budget: f64) -> Self {
        Self {
            budget: non_negative(budget),
            include_reference: false,
            max_count: None,
        }
    }

    pub fn include_reference(mut self, include: bool) -> Self {
        self.include_reference = include;
        self
    }

    pub fn max_count(mut self, max_count: Option<usize>) -> Self {
        self.max_count = max_count;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPlan {
    pub selected: Vec<EnrichedPack>,
    pub budget: f64,
    pub spent: f64,
    pub total_value: f64,
    pub effective_value_per_dollar: f64,
    pub remaining_budget: f64,
    pub considered: usize,
    pub excluded: usize,
}

/// Totals of a budget plan without the selected packs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub budget: f64,
    pub total_spent: f64,
    pub remaining_budget: f64,
    pub total_value: f64,
    pub effective_value_per_dollar: f64,
    pub selected: usize,
    pub considered: usize,
    pub excluded: usize,
}

impl BudgetPlan {
    pub fn summary(&self) -> BudgetSummary {
        BudgetSummary {
            budget: self.budget,
            total_spent: self.spent,
            remaining_budget: self.remaining_budget,
            total_value: self.total_value,
            effective_value_per_dollar: self.effective_value_per_dollar,
            selected: self.selected.len(),
            considered: self.considered,
            excluded: self.excluded,
        }
    }
}

/// Greedily fill `request.budget` with the best value-per-dollar packs.
///
/// Candidates are ranked by value per dollar, highest first. Equal values
/// are broken by profile score only when both packs carry one; otherwise
/// input order holds. A pack that does not fit is skipped and never
/// revisited.
pub fn plan_budget(packs: &[EnrichedPack], request: &BudgetRequest) -> BudgetPlan {
    let budget = request.budget;
    let mut eligible: Vec<&EnrichedPack> = packs
        .iter()
        .filter(|pack| pack.price_amount() > 0.0)
        .filter(|pack| request.include_reference || !pack.is_reference())
        .collect();
    rank_candidates(&mut eligible);

    let mut selected = Vec::new();
    let mut spent = 0.0;
    let mut total_value = 0.0;
    for pack in &eligible {
        if request.max_count.is_some_and(|max| selected.len() >= max) {
            break;
        }
        let price = pack.price_amount();
        if fits(spent, price, budget) {
            spent += price;
            total_value += pack.pack.value;
            selected.push((*pack).clone());
        }
    }

    let effective_value_per_dollar = if spent > 0.0 { total_value / spent } else { 0.0 };
    let considered = eligible.len();

    event!(
        target: "pack_core::planner::budget",
        Level::DEBUG,
        budget,
        spent,
        total_value,
        considered,
        selected = selected.len(),
    );

    BudgetPlan {
        selected,
        budget,
        spent,
        total_value,
        effective_value_per_dollar,
        remaining_budget: (budget - spent).max(0.0),
        considered,
        excluded: packs.len() - considered,
    }
}

fn rank_candidates(candidates: &mut [&EnrichedPack]) {
    candidates.sort_by(|a, b| b.value_per_dollar.total_cmp(&a.value_per_dollar));

    // The profile tie-break is only defined between two scored packs, which
    // is not a total order. Apply it within each equal-value run using
    // adjacent swaps so unscored packs hold their place.
    let mut start = 0;
    while start < candidates.len() {
        let vpd = candidates[start].value_per_dollar;
        let end = candidates[start + 1..]
            .iter()
            .position(|pack| pack.value_per_dollar.total_cmp(&vpd) != Ordering::Equal)
            .map_or(candidates.len(), |offset| start + 1 + offset);
        settle_by_profile(&mut candidates[start..end]);
        start = end;
    }
}

fn settle_by_profile(run: &mut [&EnrichedPack]) {
    for i in 1..run.len() {
        let mut j = i;
        while j > 0 && profile_prefers(run[j], run[j - 1]) {
            run.swap(j, j - 1);
            j -= 1;
        }
    }
}

fn profile_prefers(candidate: &EnrichedPack, incumbent: &EnrichedPack) -> bool {
    match (candidate.profile_score(), incumbent.profile_score()) {
        (Some(candidate), Some(incumbent)) => candidate > incumbent,
        _ => false,
    }
}
