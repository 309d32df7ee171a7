//! Database initialization.

use rusqlite::Connection;

use crate::{
    Error, budget::create_budget_table, settings::create_settings_table,
    transaction::create_transaction_table,
};

/// Create all of the application's tables if they do not already exist.
///
/// The tables are created inside a single exclusive transaction so a
/// half-initialized database is never left behind.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = rusqlite::Transaction::new_unchecked(
        connection,
        rusqlite::TransactionBehavior::Exclusive,
    )?;

    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_settings_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialization failed");
        initialize(&connection).expect("second initialization failed");
    }
}
