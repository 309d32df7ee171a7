//! Transaction data aggregation for reports, exports and charts.
//!
//! Every function here is pure: it takes a snapshot of transactions and
//! budgets and returns freshly built values. Nothing is rounded; formatting
//! is left to whoever presents the numbers.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize, ser::SerializeMap};
use time::{Date, Duration};

use crate::{
    budget::Budget,
    dates::{deserialize_iso_date, serialize_iso_date},
    transaction::{Transaction, TransactionType},
};

/// Income and expense totals for a single calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    /// The calendar date the totals are for.
    #[serde(
        serialize_with = "serialize_iso_date",
        deserialize_with = "deserialize_iso_date"
    )]
    pub date: Date,
    /// Sum of income on this date.
    pub income: f64,
    /// Sum of expenses on this date.
    pub expense: f64,
}

/// Total expenses per category, in the order each category was first seen.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    totals: Vec<(String, f64)>,
    positions: HashMap<String, usize>,
}

impl CategoryBreakdown {
    fn add(&mut self, category: &str, amount: f64) {
        match self.positions.get(category) {
            Some(&position) => self.totals[position].1 += amount,
            None => {
                self.positions.insert(category.to_owned(), self.totals.len());
                self.totals.push((category.to_owned(), amount));
            }
        }
    }

    /// The expense total for `category`, or `None` if it had no expenses.
    pub fn get(&self, category: &str) -> Option<f64> {
        self.positions
            .get(category)
            .map(|&position| self.totals[position].1)
    }

    /// Iterate over `(category, total)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals
            .iter()
            .map(|(category, total)| (category.as_str(), *total))
    }

    /// The number of categories with at least one expense.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether there were no expenses at all.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.totals.len()))?;
        for (category, total) in &self.totals {
            map.serialize_entry(category, total)?;
        }
        map.end()
    }
}

/// How much of a budget has been used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    /// The budget's category.
    pub category: String,
    /// The budget ceiling.
    pub budget: f64,
    /// Total expenses in the budget's category.
    pub spent: f64,
    /// `budget - spent`, negative when the budget is overspent.
    pub remaining: f64,
}

/// The headline numbers of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of all income.
    pub total_income: f64,
    /// Sum of all expenses.
    pub total_expenses: f64,
    /// Sum of every budget's amount, regardless of period.
    pub total_budget: f64,
    /// `total_income - total_expenses`.
    pub net_savings: f64,
    /// Net savings as a percentage of income, or 0 when there is no income.
    pub savings_rate: f64,
    /// One entry per budget, in the same order as the budgets were given.
    pub budget_utilization: Vec<BudgetUtilization>,
}

/// Income, expenses and the resulting balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of all income.
    pub total_income: f64,
    /// Sum of all expenses.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub current_balance: f64,
}

/// Everything the report endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Daily income and expense totals, oldest first.
    pub income_expense_data: Vec<DailyTotals>,
    /// Expense totals per category.
    pub category_data: CategoryBreakdown,
    /// The headline numbers and budget utilization.
    pub summary: Summary,
}

/// The length of the window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    /// From the first day of the current month.
    #[default]
    Monthly,
    /// From the first day of the month three months before the current one.
    Quarterly,
    /// From January 1 of the current year.
    Yearly,
}

impl Timeframe {
    /// Parse a timeframe from a query string value.
    ///
    /// Missing or unrecognized values fall back to [Timeframe::Monthly].
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("monthly") => Timeframe::Monthly,
            Some("quarterly") => Timeframe::Quarterly,
            Some("yearly") => Timeframe::Yearly,
            _ => Timeframe::default(),
        }
    }
}

/// Sum income and expenses per calendar date.
///
/// The input can be in any order. The output has one entry per distinct date,
/// sorted from oldest to newest.
pub fn compute_time_series(transactions: &[Transaction]) -> Vec<DailyTotals> {
    let mut totals_by_date: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let totals = totals_by_date.entry(transaction.date).or_insert((0.0, 0.0));

        match transaction.transaction_type {
            TransactionType::Income => totals.0 += transaction.amount,
            TransactionType::Expense => totals.1 += transaction.amount,
        }
    }

    totals_by_date
        .into_iter()
        .map(|(date, (income, expense))| DailyTotals {
            date,
            income,
            expense,
        })
        .collect()
}

/// Sum expenses per category.
///
/// Income is ignored. Categories are compared by exact string equality.
pub fn compute_category_breakdown(transactions: &[Transaction]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::default();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
    {
        breakdown.add(&transaction.category, transaction.amount);
    }

    breakdown
}

/// Sum income and expenses and take the difference.
pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let (total_income, total_expenses) = sum_by_type(transactions);

    Totals {
        total_income,
        total_expenses,
        current_balance: total_income - total_expenses,
    }
}

/// Compute the headline numbers and the utilization of each budget.
///
/// `spent` for each budget is the full expense total of its category, so
/// two budgets with the same category both report the same `spent`.
/// The budgets themselves are left untouched.
pub fn compute_summary(transactions: &[Transaction], budgets: &[Budget]) -> Summary {
    let (total_income, total_expenses) = sum_by_type(transactions);
    let total_budget = budgets.iter().map(|budget| budget.amount).sum();
    let net_savings = total_income - total_expenses;

    let savings_rate = if total_income > 0.0 {
        net_savings / total_income * 100.0
    } else {
        0.0
    };

    let expenses_by_category = compute_category_breakdown(transactions);
    let budget_utilization = budgets
        .iter()
        .map(|budget| {
            let spent = expenses_by_category.get(&budget.category).unwrap_or(0.0);

            BudgetUtilization {
                category: budget.category.clone(),
                budget: budget.amount,
                spent,
                remaining: budget.amount - spent,
            }
        })
        .collect();

    Summary {
        total_income,
        total_expenses,
        total_budget,
        net_savings,
        savings_rate,
        budget_utilization,
    }
}

/// Build the full report for a snapshot of transactions and budgets.
pub fn build_report(transactions: &[Transaction], budgets: &[Budget]) -> Report {
    Report {
        income_expense_data: compute_time_series(transactions),
        category_data: compute_category_breakdown(transactions),
        summary: compute_summary(transactions, budgets),
    }
}

/// Get the first date included in a report window ending on `today`.
///
/// The quarterly window is a fixed three month lookback anchored to the
/// first of the month, not a calendar quarter: on 2024-05-15 it starts on
/// 2024-02-01.
pub fn select_window_start(timeframe: Timeframe, today: Date) -> Date {
    match timeframe {
        Timeframe::Monthly => first_of_month(today),
        Timeframe::Quarterly => {
            let mut start = first_of_month(today);

            for _ in 0..3 {
                start = first_of_month(start - Duration::days(1));
            }

            start
        }
        Timeframe::Yearly => today - Duration::days(i64::from(today.ordinal()) - 1),
    }
}

fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

fn sum_by_type(transactions: &[Transaction]) -> (f64, f64) {
    transactions
        .iter()
        .fold((0.0, 0.0), |(income, expenses), transaction| {
            match transaction.transaction_type {
                TransactionType::Income => (income + transaction.amount, expenses),
                TransactionType::Expense => (income, expenses + transaction.amount),
            }
        })
}
