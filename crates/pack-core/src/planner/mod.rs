//! Greedy allocation planners.
//!
//! Both planners make a single forward pass over a sorted candidate list and
//! never backtrack. Results are deterministic but not optimal.

mod budget;
mod goal;

pub use budget::{BudgetPlan, BudgetRequest, BudgetSummary, plan_budget};
pub use goal::{
    GoalPlan, GoalRequest, GoalSelection, GoalStatus, GoalSummary, matching_item_ids, plan_goal,
};

/// Slack allowed when comparing accumulated spend against a budget.
pub const BUDGET_EPSILON: f64 = 1e-9;

fn fits(spent: f64, price: f64, budget: f64) -> bool {
    spent + price <= budget + BUDGET_EPSILON
}
