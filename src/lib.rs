//! A personal finance tracker.
//!
//! This library provides a JSON REST API for recording transactions, managing
//! budgets and settings, and building financial reports. Reports are computed
//! on demand by the pure functions in the report aggregation engine and can be
//! served as JSON, chart options, PDF or CSV.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod budget;
mod currency;
mod database_id;
mod dates;
mod db;
pub mod endpoints;
mod json;
mod logging;
mod report;
mod routing;
mod settings;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{
    BudgetUtilization, CategoryBreakdown, DailyTotals, Report, Summary, Timeframe, Totals,
    build_report, compute_category_breakdown, compute_summary, compute_time_series,
    compute_totals, select_window_start,
};
pub use routing::build_router;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = ctrl_c => "ctrl+c",
        _ = terminate => "terminate",
    };

    tracing::info!("Received {signal_name} signal, shutting down.");
    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction was submitted without a description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A transaction, budget or settings category was empty or only whitespace.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A transaction amount was negative, NaN or infinite.
    #[error("{0} is not a valid amount, amounts must be a non-negative number")]
    InvalidAmount(f64),

    /// A budget ceiling was zero, negative, NaN or infinite.
    #[error("{0} is not a valid budget amount, budgets must be greater than zero")]
    NonPositiveBudget(f64),

    /// The transaction type was something other than "income" or "expense".
    ///
    /// Transactions with an unknown type would silently drop out of every
    /// report total, so they are rejected before they are stored.
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// The budget period was something other than "Weekly", "Monthly" or "Yearly".
    #[error("\"{0}\" is not a valid budget period, expected \"Weekly\", \"Monthly\" or \"Yearly\"")]
    InvalidBudgetPeriod(String),

    /// A date string could not be parsed.
    #[error("could not parse the date \"{0}\", expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    /// The profile was submitted without a name.
    #[error("name cannot be empty")]
    EmptyName,

    /// The profile was submitted without an email address.
    #[error("email cannot be empty")]
    EmptyEmail,

    /// The currency code is not one of the supported display currencies.
    #[error("\"{0}\" is not a supported currency, expected INR, USD or EUR")]
    InvalidCurrency(String),

    /// The request body was not valid JSON or did not have the expected shape.
    #[error("invalid request body: {0}")]
    InvalidJson(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// A report could not be rendered into an export format.
    #[error("could not export the report: {0}")]
    ExportError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyDescription
            | Error::EmptyCategory
            | Error::InvalidAmount(_)
            | Error::NonPositiveBudget(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidBudgetPeriod(_)
            | Error::InvalidDate(_)
            | Error::EmptyName
            | Error::EmptyEmail
            | Error::InvalidCurrency(_)
            | Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::NotFound
            | Error::DeleteMissingTransaction
            | Error::DeleteMissingBudget
            | Error::UpdateMissingBudget => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_)
            | Error::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to a valid, canonical timezone string"
            ),
            // Any other server errors are not intended to be shown to the client.
            error if status.is_server_error() => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
