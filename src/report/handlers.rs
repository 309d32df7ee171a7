//! Report HTTP handlers.
//!
//! This module contains:
//! - The JSON report and chart endpoints, which cover the window picked by
//!   the `timeframe` query parameter
//! - The PDF and CSV export endpoints, which cover every transaction
//! - The state and query types used by the handlers

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    budget::get_all_budgets,
    report::{
        Report, Timeframe, build_report, compute_category_breakdown, compute_summary,
        compute_time_series,
        charts::ReportCharts,
        export::{CsvExporter, ExportData, PdfExporter, ReportExporter},
        select_window_start,
    },
    settings::{DEFAULT_SETTINGS_KEY, get_or_create_settings},
    timezone::local_today,
    transaction::{SortOrder, Transaction, TransactionQuery, query_transactions},
};

/// The state needed by the report handlers.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string accepted by endpoints that report over a window.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeframeQuery {
    /// "monthly", "quarterly" or "yearly". Anything else means monthly.
    pub timeframe: Option<String>,
}

impl TimeframeQuery {
    /// The requested timeframe, defaulting to monthly.
    pub fn timeframe(&self) -> Timeframe {
        Timeframe::from_query(self.timeframe.as_deref())
    }
}

/// Get the transactions from the start of the `timeframe` window up to now,
/// oldest first.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `local_timezone` is not valid, or
/// [Error::SqlError] if the transactions could not be read.
pub(crate) fn get_window_transactions(
    timeframe: Timeframe,
    local_timezone: &str,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let window_start = select_window_start(timeframe, local_today(local_timezone)?);

    query_transactions(
        &TransactionQuery {
            date_from: Some(window_start),
            sort_order: SortOrder::Ascending,
            limit: None,
        },
        connection,
    )
    .inspect_err(|error| {
        tracing::error!("Could not get transactions since {window_start}: {error}")
    })
}

/// A route handler for the report over the requested window.
pub async fn get_report_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<Report>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let transactions =
        get_window_transactions(query.timeframe(), &state.local_timezone, &connection)?;
    let budgets = get_all_budgets(&connection)
        .inspect_err(|error| tracing::error!("Could not get budgets: {error}"))?;

    Ok(Json(build_report(&transactions, &budgets)))
}

/// A route handler for the chart options over the requested window.
pub async fn get_report_charts_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<ReportCharts>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let transactions =
        get_window_transactions(query.timeframe(), &state.local_timezone, &connection)?;
    let currency = get_or_create_settings(DEFAULT_SETTINGS_KEY, &connection)?
        .profile
        .currency;

    ReportCharts::new(
        &compute_time_series(&transactions),
        &compute_category_breakdown(&transactions),
        currency,
    )
    .map(Json)
}

/// A route handler that downloads the report as a PDF.
pub async fn export_pdf_endpoint(State(state): State<ReportState>) -> Result<Response, Error> {
    export(&PdfExporter, &state)
}

/// A route handler that downloads the transactions as CSV.
pub async fn export_csv_endpoint(State(state): State<ReportState>) -> Result<Response, Error> {
    export(&CsvExporter, &state)
}

fn export(exporter: &impl ReportExporter, state: &ReportState) -> Result<Response, Error> {
    let data = {
        let connection = lock_connection(&state.db_connection)?;
        let transactions = query_transactions(&TransactionQuery::default(), &connection)
            .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?;
        let budgets = get_all_budgets(&connection)
            .inspect_err(|error| tracing::error!("Could not get budgets: {error}"))?;
        let currency = get_or_create_settings(DEFAULT_SETTINGS_KEY, &connection)?
            .profile
            .currency;
        let summary = compute_summary(&transactions, &budgets);

        ExportData {
            transactions,
            summary,
            currency,
        }
    };

    let file = exporter
        .render(&data)
        .inspect_err(|error| tracing::error!("Could not export report: {error}"))?;

    tracing::debug!(
        "Exported {} transactions to {}",
        data.transactions.len(),
        exporter.file_name()
    );

    Ok((
        [
            (CONTENT_TYPE, exporter.content_type().to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={}", exporter.file_name()),
            ),
        ],
        file,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::to_bytes,
        extract::{Query, State},
        http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    };
    use rusqlite::Connection;
    use time::{Duration, macros::date};

    use crate::{
        budget::{BudgetPeriod, NewBudget, create_budget},
        db::initialize,
        timezone::local_today,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{
        ReportState, TimeframeQuery, export_csv_endpoint, export_pdf_endpoint,
        get_report_endpoint,
    };

    fn get_test_state() -> ReportState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ReportState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn timeframe(value: &str) -> Query<TimeframeQuery> {
        Query(TimeframeQuery {
            timeframe: Some(value.to_owned()),
        })
    }

    #[tokio::test]
    async fn report_only_includes_current_window() {
        let state = get_test_state();
        let today = local_today(&state.local_timezone).unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionType::Income, 100.0, today),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(TransactionType::Expense, 40.0, today).category("Food"),
                &connection,
            )
            .unwrap();
            // Always before the start of the current year.
            create_transaction(
                Transaction::build(TransactionType::Expense, 999.0, today - Duration::days(400))
                    .category("Food"),
                &connection,
            )
            .unwrap();
            create_budget(
                NewBudget {
                    category: "Food".to_owned(),
                    amount: 100.0,
                    period: BudgetPeriod::Monthly,
                },
                &connection,
            )
            .unwrap();
        }

        let report = get_report_endpoint(State(state), timeframe("yearly"))
            .await
            .unwrap()
            .0;

        assert_eq!(report.summary.total_income, 100.0);
        assert_eq!(report.summary.total_expenses, 40.0);
        assert_eq!(report.summary.savings_rate, 60.0);
        assert_eq!(report.summary.budget_utilization[0].spent, 40.0);
        assert_eq!(report.income_expense_data.len(), 1);
        assert_eq!(report.category_data.get("Food"), Some(40.0));
    }

    #[tokio::test]
    async fn unknown_timeframe_reports_current_month() {
        let state = get_test_state();
        let today = local_today(&state.local_timezone).unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionType::Expense, 5.0, today.replace_day(1).unwrap()),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(TransactionType::Expense, 7.0, date!(1999 - 12 - 31)),
                &connection,
            )
            .unwrap();
        }

        let report = get_report_endpoint(State(state), timeframe("fortnightly"))
            .await
            .unwrap()
            .0;

        assert_eq!(report.summary.total_expenses, 5.0);
    }

    #[tokio::test]
    async fn csv_export_is_an_attachment() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionType::Expense, 3.5, date!(2024 - 06 - 01))
                    .description("Coffee")
                    .category("Food"),
                &connection,
            )
            .unwrap();
        }

        let response = export_csv_endpoint(State(state)).await.unwrap();

        assert_eq!(response.headers()[CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=financial-report.csv"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(
            body,
            "date,description,amount,type,category\n2024-06-01,Coffee,₹3.50,expense,Food\n"
        );
    }

    #[tokio::test]
    async fn pdf_export_is_a_pdf() {
        let response = export_pdf_endpoint(State(get_test_state())).await.unwrap();

        assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF-"));
    }
}
