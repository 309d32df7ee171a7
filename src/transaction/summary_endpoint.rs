//! The dashboard summary: running totals plus the most recent transactions.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    report::{Totals, compute_totals},
    transaction::{Transaction, TransactionQuery, query_transactions},
};

/// How many transactions to include in `recentTransactions`.
const RECENT_TRANSACTION_COUNT: usize = 5;

/// The response body for the transaction summary endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// Income, expenses and the balance over every transaction ever recorded.
    pub summary: Totals,
    /// The newest transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
}

/// A route handler for the all-time totals and the most recent transactions.
pub async fn get_transaction_summary_endpoint(
    State(state): State<DatabaseState>,
) -> Result<Json<TransactionSummary>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let all_transactions = query_transactions(&TransactionQuery::default(), &connection)
        .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?;

    // The full list is already newest first.
    let recent_transactions = all_transactions
        .iter()
        .take(RECENT_TRANSACTION_COUNT)
        .cloned()
        .collect();

    Ok(Json(TransactionSummary {
        summary: compute_totals(&all_transactions),
        recent_transactions,
    }))
}
