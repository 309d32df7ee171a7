//! Application router configuration.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use crate::{
    AppState, Error,
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budgets_endpoint,
        update_budget_endpoint,
    },
    endpoints,
    logging::logging_middleware,
    report::{
        export_csv_endpoint, export_pdf_endpoint, get_report_charts_endpoint, get_report_endpoint,
    },
    settings::{
        add_category_endpoint, get_settings_endpoint, remove_category_endpoint,
        update_notifications_endpoint, update_profile_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transaction_summary_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let transaction_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_SUMMARY,
            get(get_transaction_summary_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).delete(delete_transaction_endpoint),
        );

    let budget_routes = Router::new()
        .route(
            endpoints::BUDGETS,
            get(get_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(
            endpoints::BUDGET,
            put(update_budget_endpoint).delete(delete_budget_endpoint),
        );

    let report_routes = Router::new()
        .route(endpoints::REPORTS, get(get_report_endpoint))
        .route(endpoints::REPORT_CHARTS, get(get_report_charts_endpoint))
        .route(endpoints::EXPORT_PDF, get(export_pdf_endpoint))
        .route(endpoints::EXPORT_CSV, get(export_csv_endpoint));

    let settings_routes = Router::new()
        .route(endpoints::SETTINGS, get(get_settings_endpoint))
        .route(endpoints::SETTINGS_PROFILE, put(update_profile_endpoint))
        .route(
            endpoints::SETTINGS_NOTIFICATIONS,
            put(update_notifications_endpoint),
        )
        .route(endpoints::SETTINGS_CATEGORIES, post(add_category_endpoint))
        .route(
            endpoints::SETTINGS_CATEGORY,
            delete(remove_category_endpoint),
        );

    transaction_routes
        .merge(budget_routes)
        .merge(report_routes)
        .merge(settings_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
