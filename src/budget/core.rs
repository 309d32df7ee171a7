//! Budget models and their database queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::BudgetId, json::deserialize_amount};

/// How often a budget resets.
///
/// The period is descriptive only: reports compare every budget against the
/// expenses in the requested window, whatever its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetPeriod {
    /// A budget for each week.
    Weekly,
    /// A budget for each month.
    Monthly,
    /// A budget for each year.
    Yearly,
}

impl BudgetPeriod {
    /// The name used in JSON and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "Weekly",
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Yearly => "Yearly",
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Weekly" => Ok(BudgetPeriod::Weekly),
            "Monthly" => Ok(BudgetPeriod::Monthly),
            "Yearly" => Ok(BudgetPeriod::Yearly),
            other => Err(Error::InvalidBudgetPeriod(other.to_owned())),
        }
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for BudgetPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BudgetPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// A spending ceiling for one category.
///
/// How much of the budget has been spent is not stored here, it is computed
/// from the transactions whenever a report asks for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The category the budget applies to, matched exactly against
    /// transaction categories.
    pub category: String,
    /// The ceiling, always greater than zero.
    pub amount: f64,
    /// How often the budget resets.
    pub period: BudgetPeriod,
}

/// A budget that passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// The category the budget applies to.
    pub category: String,
    /// The ceiling.
    pub amount: f64,
    /// How often the budget resets.
    pub period: BudgetPeriod,
}

/// The JSON body for creating or replacing a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetForm {
    /// The category the budget applies to.
    #[serde(default)]
    pub category: String,
    /// The ceiling, as a number or a numeric string.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// One of "Weekly", "Monthly" or "Yearly".
    #[serde(default)]
    pub period: String,
}

impl BudgetForm {
    /// Check every field and convert the form into a [NewBudget].
    ///
    /// # Errors
    /// Returns the first validation error found, in field order:
    /// [Error::EmptyCategory], [Error::NonPositiveBudget], [Error::InvalidBudgetPeriod].
    pub fn validate(self) -> Result<NewBudget, Error> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveBudget(self.amount));
        }

        let period = self.period.trim().parse()?;

        Ok(NewBudget {
            category: category.to_owned(),
            amount: self.amount,
            period,
        })
    }
}

/// Store a new budget.
///
/// # Errors
/// Returns an [Error::SqlError] if there is some SQL error.
pub fn create_budget(budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "INSERT INTO budget (category, amount, period) VALUES (?1, ?2, ?3)
             RETURNING id, category, amount, period",
        )?
        .query_row(
            (budget.category, budget.amount, budget.period),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Get every budget in the order they were created.
///
/// # Errors
/// Returns an [Error::SqlError] if there is some SQL error.
pub fn get_all_budgets(connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare("SELECT id, category, amount, period FROM budget ORDER BY id ASC")?
        .query_map([], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Get a budget by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare("SELECT id, category, amount, period FROM budget WHERE id = :id")?
        .query_row(&[(":id", &id)], map_budget_row)?;

    Ok(budget)
}

/// Replace the fields of the budget `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingBudget] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    budget: NewBudget,
    connection: &Connection,
) -> Result<Budget, Error> {
    let rows_affected = connection.execute(
        "UPDATE budget SET category = ?1, amount = ?2, period = ?3 WHERE id = ?4",
        (budget.category, budget.amount, budget.period, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    get_budget(id, connection)
}

/// Delete a budget by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingBudget] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                period TEXT NOT NULL CHECK (period IN ('Weekly', 'Monthly', 'Yearly'))
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Budget].
pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        period: row.get(3)?,
    })
}


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{
        BudgetPeriod, NewBudget, create_budget, delete_budget, get_all_budgets, get_budget,
        update_budget,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn new_budget(category: &str, amount: f64) -> NewBudget {
        NewBudget {
            category: category.to_owned(),
            amount,
            period: BudgetPeriod::Monthly,
        }
    }

    #[test]
    fn create_and_get_budget() {
        let connection = get_test_connection();

        let created = create_budget(new_budget("Food", 200.0), &connection).unwrap();
        let fetched = get_budget(created.id, &connection).unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.category, "Food");
        assert_eq!(fetched.period, BudgetPeriod::Monthly);
    }

    #[test]
    fn get_all_keeps_creation_order() {
        let connection = get_test_connection();
        for category in ["Rent", "Food", "Fun"] {
            create_budget(new_budget(category, 1.0), &connection).unwrap();
        }

        let categories: Vec<_> = get_all_budgets(&connection)
            .unwrap()
            .into_iter()
            .map(|budget| budget.category)
            .collect();

        assert_eq!(categories, vec!["Rent", "Food", "Fun"]);
    }

    #[test]
    fn update_replaces_fields() {
        let connection = get_test_connection();
        let created = create_budget(new_budget("Food", 200.0), &connection).unwrap();

        let updated = update_budget(
            created.id,
            NewBudget {
                category: "Groceries".to_owned(),
                amount: 300.0,
                period: BudgetPeriod::Yearly,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.category, "Groceries");
        assert_eq!(updated.amount, 300.0);
        assert_eq!(updated.period, BudgetPeriod::Yearly);
    }

    #[test]
    fn update_missing_budget_fails() {
        let connection = get_test_connection();

        assert_eq!(
            update_budget(42, new_budget("Food", 1.0), &connection),
            Err(Error::UpdateMissingBudget)
        );
    }

    #[test]
    fn delete_budget_removes_it() {
        let connection = get_test_connection();
        let created = create_budget(new_budget("Food", 200.0), &connection).unwrap();

        delete_budget(created.id, &connection).unwrap();

        assert_eq!(get_budget(created.id, &connection), Err(Error::NotFound));
        assert_eq!(
            delete_budget(created.id, &connection),
            Err(Error::DeleteMissingBudget)
        );
    }
}
