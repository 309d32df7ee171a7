//! Route handlers for budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    budget::{Budget, BudgetForm, create_budget, delete_budget, get_all_budgets, update_budget},
    database_id::BudgetId,
    json::JsonBody,
    report::{TimeframeQuery, compute_summary, get_window_transactions},
};

/// The state needed by the budget handlers.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A budget together with how much of it has been used in the report window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetWithUtilization {
    /// The stored budget.
    #[serde(flatten)]
    pub budget: Budget,
    /// Expenses in the budget's category within the window.
    pub spent: f64,
    /// `amount - spent`.
    pub remaining: f64,
}

/// A route handler that lists every budget with its utilization over the
/// window picked by the `timeframe` query parameter.
pub async fn get_budgets_endpoint(
    State(state): State<BudgetState>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<Vec<BudgetWithUtilization>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let budgets = get_all_budgets(&connection)
        .inspect_err(|error| tracing::error!("Could not get budgets: {error}"))?;
    let transactions =
        get_window_transactions(query.timeframe(), &state.local_timezone, &connection)?;

    let summary = compute_summary(&transactions, &budgets);

    let budgets = budgets
        .into_iter()
        .zip(summary.budget_utilization)
        .map(|(budget, utilization)| BudgetWithUtilization {
            budget,
            spent: utilization.spent,
            remaining: utilization.remaining,
        })
        .collect();

    Ok(Json(budgets))
}

/// A route handler for creating a budget.
///
/// Responds with `201 Created` and the stored budget.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    JsonBody(form): JsonBody<BudgetForm>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let new_budget = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let budget = create_budget(new_budget, &connection)
        .inspect_err(|error| tracing::error!("Could not create budget: {error}"))?;

    tracing::info!("Created budget {} for {}", budget.id, budget.category);

    Ok((StatusCode::CREATED, Json(budget)))
}

/// A route handler for replacing a budget.
///
/// Responds with `404 Not Found` if the budget does not exist.
pub async fn update_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<BudgetId>,
    JsonBody(form): JsonBody<BudgetForm>,
) -> Result<Json<Budget>, Error> {
    let new_budget = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    let budget = update_budget(budget_id, new_budget, &connection).inspect_err(|error| {
        match error {
            Error::UpdateMissingBudget => {
                tracing::debug!("Tried to update missing budget {budget_id}")
            }
            error => tracing::error!("Could not update budget {budget_id}: {error}"),
        }
    })?;

    Ok(Json(budget))
}

/// A route handler for deleting a budget.
///
/// Responds with `204 No Content` on success, or `404 Not Found` if the
/// budget does not exist.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<BudgetId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_budget(budget_id, &connection).inspect_err(|error| match error {
        Error::DeleteMissingBudget => {
            tracing::debug!("Tried to delete missing budget {budget_id}")
        }
        error => tracing::error!("Could not delete budget {budget_id}: {error}"),
    })?;

    tracing::info!("Deleted budget {budget_id}");

    Ok(StatusCode::NO_CONTENT)
}
