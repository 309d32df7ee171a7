//! Defines the endpoint for creating a new transaction.

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    json::JsonBody,
    transaction::{Transaction, TransactionForm, create_transaction},
};

/// A route handler for creating a new transaction.
///
/// Responds with `201 Created` and the stored transaction. Invalid fields
/// are rejected with `400 Bad Request` before anything is written.
pub async fn create_transaction_endpoint(
    State(state): State<DatabaseState>,
    JsonBody(form): JsonBody<TransactionForm>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let builder = form
        .validate()
        .inspect_err(|error| tracing::debug!("Rejected transaction: {error}"))?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(builder, &connection)?;
    tracing::info!("Created transaction {}", transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)))
}
