//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    dates::{deserialize_iso_date, parse_date, serialize_iso_date},
    json::deserialize_amount,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON, CSV and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction, never negative.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category of the transaction, e.g. "Food", "Housing".
    pub category: String,
    /// When the transaction happened.
    #[serde(
        serialize_with = "serialize_iso_date",
        deserialize_with = "deserialize_iso_date"
    )]
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(transaction_type: TransactionType, amount: f64, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            date,
            description: "Transaction".to_owned(),
            category: "Other".to_owned(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder does not validate its fields. Data coming from clients should
/// go through [TransactionForm::validate], which produces a builder only when
/// every field is valid.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,

    /// The monetary amount of the transaction.
    ///
    /// Always non-negative, the direction of the money is given by
    /// `transaction_type`.
    pub amount: f64,

    /// The date when the transaction occurred.
    pub date: Date,

    /// A human-readable description of the transaction.
    ///
    /// Defaults to "Transaction" if not specified.
    pub description: String,

    /// The category of the transaction.
    ///
    /// Defaults to "Other" if not specified. Categories are matched against
    /// budgets by exact string equality.
    pub category: String,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }
}

/// The JSON body for creating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The value of the transaction, as a number or a numeric string.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// Either "income" or "expense".
    #[serde(rename = "type", default)]
    pub transaction_type: String,
    /// The category of the transaction.
    #[serde(default)]
    pub category: String,
    /// The date of the transaction, either `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    pub date: String,
}

impl TransactionForm {
    /// Check every field and convert the form into a [TransactionBuilder].
    ///
    /// Description and category are trimmed. The category is otherwise kept
    /// as-is, so "food" and "Food" are different categories.
    ///
    /// # Errors
    /// Returns the first validation error found, in field order:
    /// [Error::EmptyDescription], [Error::InvalidAmount],
    /// [Error::InvalidTransactionType], [Error::EmptyCategory], [Error::InvalidDate].
    pub fn validate(self) -> Result<TransactionBuilder, Error> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        let transaction_type: TransactionType = self.transaction_type.trim().parse()?;

        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        let date = parse_date(&self.date)?;

        Ok(Transaction::build(transaction_type, self.amount, date)
            .description(description)
            .category(category))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (description, amount, type, category, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, description, amount, type, category, date",
        )?
        .query_row(
            (
                builder.description,
                builder.amount,
                builder.transaction_type,
                builder.category,
                builder.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, description, amount, type, category, date FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Delete a transaction by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Report queries filter and sort by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let transaction_type = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;

    Ok(Transaction {
        id,
        description,
        amount,
        transaction_type,
        category,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod form_tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{Transaction, TransactionForm, TransactionType},
    };

    fn valid_form() -> TransactionForm {
        TransactionForm {
            description: "  Weekly shop ".to_owned(),
            amount: 42.5,
            transaction_type: "expense".to_owned(),
            category: "Food".to_owned(),
            date: "2024-01-02".to_owned(),
        }
    }

    #[test]
    fn valid_form_produces_builder() {
        let builder = valid_form().validate();

        assert_eq!(
            builder,
            Ok(
                Transaction::build(TransactionType::Expense, 42.5, date!(2024 - 01 - 02))
                    .description("Weekly shop")
                    .category("Food")
            )
        );
    }

    #[test]
    fn rejects_empty_description() {
        let form = TransactionForm {
            description: "   ".to_owned(),
            ..valid_form()
        };

        assert_eq!(form.validate(), Err(Error::EmptyDescription));
    }

    #[test]
    fn rejects_negative_amount() {
        let form = TransactionForm {
            amount: -1.0,
            ..valid_form()
        };

        assert_eq!(form.validate(), Err(Error::InvalidAmount(-1.0)));
    }

    #[test]
    fn rejects_nan_amount() {
        let form = TransactionForm {
            amount: f64::NAN,
            ..valid_form()
        };

        assert!(matches!(form.validate(), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn rejects_unknown_type() {
        let form = TransactionForm {
            transaction_type: "transfer".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn type_is_case_sensitive() {
        let form = TransactionForm {
            transaction_type: "Income".to_owned(),
            ..valid_form()
        };

        assert!(form.validate().is_err());
    }

    #[test]
    fn rejects_empty_category() {
        let form = TransactionForm {
            category: "".to_owned(),
            ..valid_form()
        };

        assert_eq!(form.validate(), Err(Error::EmptyCategory));
    }

    #[test]
    fn rejects_bad_date() {
        let form = TransactionForm {
            date: "02/01/2024".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::InvalidDate("02/01/2024".to_owned()))
        );
    }

    #[test]
    fn amount_may_be_a_numeric_string() {
        let form: TransactionForm = serde_json::from_str(
            r#"{
                "description": "Weekly shop",
                "amount": "42.5",
                "type": "expense",
                "category": "Food",
                "date": "2024-01-02"
            }"#,
        )
        .unwrap();

        assert_eq!(form.amount, 42.5);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn negative_string_amount_is_still_validated() {
        let form: TransactionForm = serde_json::from_str(
            r#"{ "description": "Refund", "amount": "-3", "type": "income", "category": "Other", "date": "2024-01-02" }"#,
        )
        .unwrap();

        assert_eq!(form.validate(), Err(Error::InvalidAmount(-3.0)));
    }
}
