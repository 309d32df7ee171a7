use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    database_id::TransactionId,
    transaction::delete_transaction,
};

/// A route handler for deleting a transaction.
///
/// Responds with `204 No Content` on success, or `404 Not Found` if the
/// transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<DatabaseState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_transaction(transaction_id, &connection).inspect_err(|error| match error {
        Error::DeleteMissingTransaction => {
            tracing::debug!("Tried to delete missing transaction {transaction_id}")
        }
        error => tracing::error!("Could not delete transaction {transaction_id}: {error}"),
    })?;

    tracing::info!("Deleted transaction {transaction_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        app_state::DatabaseState,
        initialize_db,
        transaction::{Transaction, TransactionType, create_transaction, get_transaction},
    };

    use super::delete_transaction_endpoint;

    #[tokio::test]
    async fn deletes_transaction() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let transaction = create_transaction(
            Transaction::build(TransactionType::Expense, 1.23, date!(2025 - 10 - 26)),
            &connection,
        )
        .unwrap();
        let state = DatabaseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let status = delete_transaction_endpoint(State(state.clone()), Path(transaction.id)).await;

        assert_eq!(status, Ok(StatusCode::NO_CONTENT));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_transaction_fails() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let state = DatabaseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let status = delete_transaction_endpoint(State(state), Path(7)).await;

        assert_eq!(status, Err(Error::DeleteMissingTransaction));
    }
}
