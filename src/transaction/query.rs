//! Filtered transaction queries used by the listing, summary and report endpoints.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Date;

use crate::{
    Error,
    transaction::{Transaction, map_transaction_row},
};

/// The order to sort transactions in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

/// Which transactions to fetch and how to order them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions on or after this date.
    pub date_from: Option<Date>,
    /// Sort direction for the date field.
    pub sort_order: SortOrder,
    /// Return at most this many transactions.
    pub limit: Option<u32>,
}

/// Get the transactions matching `query`.
///
/// Transactions on the same date are ordered by ID in the same direction as
/// the dates so that "most recent" queries are stable.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn query_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut sql = "SELECT id, description, amount, type, category, date FROM \"transaction\""
        .to_owned();
    let mut params: Vec<Value> = Vec::new();

    if let Some(date_from) = query.date_from {
        sql.push_str(" WHERE date >= ?");
        params.push(Value::Text(date_from.to_string()));
    }

    sql.push_str(match query.sort_order {
        SortOrder::Ascending => " ORDER BY date ASC, id ASC",
        SortOrder::Descending => " ORDER BY date DESC, id DESC",
    });

    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        params.push(Value::Integer(i64::from(limit)));
    }

    connection
        .prepare(&sql)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Duration, macros::date};

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{SortOrder, TransactionQuery, query_transactions};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert_ten_days(conn: &Connection) {
        let start = date!(2024 - 01 - 01);

        for i in 0..10 {
            create_transaction(
                Transaction::build(TransactionType::Expense, (i + 1) as f64, start + Duration::days(i))
                    .description(&format!("transaction #{i}")),
                conn,
            )
            .unwrap();
        }
    }

    #[test]
    fn default_query_returns_everything_newest_first() {
        let conn = get_test_connection();
        insert_ten_days(&conn);

        let got = query_transactions(&TransactionQuery::default(), &conn).unwrap();

        assert_eq!(got.len(), 10);
        assert_eq!(got[0].date, date!(2024 - 01 - 10));
        assert_eq!(got[9].date, date!(2024 - 01 - 01));
    }

    #[test]
    fn date_from_is_inclusive() {
        let conn = get_test_connection();
        insert_ten_days(&conn);

        let query = TransactionQuery {
            date_from: Some(date!(2024 - 01 - 06)),
            sort_order: SortOrder::Ascending,
            limit: None,
        };
        let got = query_transactions(&query, &conn).unwrap();

        assert_eq!(got.len(), 5, "got {} transactions, want 5", got.len());
        assert_eq!(got[0].date, date!(2024 - 01 - 06));
        assert!(got.windows(2).all(|pair| pair[0].date <= pair[1].date));
    }

    #[test]
    fn limit_returns_most_recent() {
        let conn = get_test_connection();
        insert_ten_days(&conn);

        let query = TransactionQuery {
            limit: Some(5),
            ..Default::default()
        };
        let got = query_transactions(&query, &conn).unwrap();

        let dates: Vec<_> = got.iter().map(|transaction| transaction.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 01 - 10),
                date!(2024 - 01 - 09),
                date!(2024 - 01 - 08),
                date!(2024 - 01 - 07),
                date!(2024 - 01 - 06),
            ]
        );
    }

    #[test]
    fn same_day_transactions_are_ordered_by_id() {
        let conn = get_test_connection();
        let day = date!(2024 - 02 - 01);
        let first =
            create_transaction(Transaction::build(TransactionType::Income, 1.0, day), &conn)
                .unwrap();
        let second =
            create_transaction(Transaction::build(TransactionType::Income, 2.0, day), &conn)
                .unwrap();

        let query = TransactionQuery {
            sort_order: SortOrder::Ascending,
            ..Default::default()
        };
        let got = query_transactions(&query, &conn).unwrap();

        assert_eq!(got, vec![first, second]);
    }

    #[test]
    fn empty_table_returns_empty_vec() {
        let conn = get_test_connection();

        let got = query_transactions(&TransactionQuery::default(), &conn).unwrap();

        assert!(got.is_empty());
    }
}
