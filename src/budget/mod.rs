//! Budgets: per-category spending ceilings.
//!
//! How much of a budget has been used is never stored, the handlers compute
//! it from the transactions in the requested report window.

mod core;
mod handlers;

pub use core::{
    Budget, BudgetForm, create_budget, create_budget_table, delete_budget, get_all_budgets,
    update_budget,
};
pub use handlers::{
    create_budget_endpoint, delete_budget_endpoint, get_budgets_endpoint, update_budget_endpoint,
};

#[cfg(test)]
pub use core::{BudgetPeriod, NewBudget, get_budget};
