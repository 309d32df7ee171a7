//! Route handlers for reading transactions.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    database_id::TransactionId,
    transaction::{Transaction, TransactionQuery, get_transaction, query_transactions},
};

/// A route handler that lists every transaction, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<DatabaseState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let transactions = query_transactions(&TransactionQuery::default(), &connection)
        .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?;

    Ok(Json(transactions))
}

/// A route handler for getting a single transaction by its ID.
///
/// Responds with `404 Not Found` if there is no such transaction.
pub async fn get_transaction_endpoint(
    State(state): State<DatabaseState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_transaction(transaction_id, &connection).map(Json)
}
