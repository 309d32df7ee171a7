//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its validated JSON form and `TransactionBuilder`
//! - Database functions for storing, querying, and deleting transactions
//! - Route handlers for the transaction endpoints

mod core;
mod create_transaction_endpoint;
mod delete_transaction_endpoint;
mod get_transactions_endpoint;
mod query;
mod summary_endpoint;

pub use core::{
    Transaction, TransactionForm, TransactionType, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, map_transaction_row,
};
pub use create_transaction_endpoint::create_transaction_endpoint;
pub use delete_transaction_endpoint::delete_transaction_endpoint;
pub use get_transactions_endpoint::{get_transaction_endpoint, get_transactions_endpoint};
pub use query::{SortOrder, TransactionQuery, query_transactions};
pub use summary_endpoint::get_transaction_summary_endpoint;

#[cfg(test)]
pub use summary_endpoint::TransactionSummary;
