//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/budgets/{budget_id}', use [format_endpoint].

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the all-time totals and most recent transactions.
pub const TRANSACTION_SUMMARY: &str = "/api/transactions/summary";
/// The route to get or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to update or delete a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The route for the report over a timeframe.
pub const REPORTS: &str = "/api/reports";
/// The route for the report chart options.
pub const REPORT_CHARTS: &str = "/api/reports/charts";
/// The route to download the report as a PDF.
pub const EXPORT_PDF: &str = "/api/reports/export/pdf";
/// The route to download the transactions as CSV.
pub const EXPORT_CSV: &str = "/api/reports/export/csv";
/// The route for the settings document.
pub const SETTINGS: &str = "/api/settings";
/// The route to replace the profile settings.
pub const SETTINGS_PROFILE: &str = "/api/settings/profile";
/// The route to replace the notification settings.
pub const SETTINGS_NOTIFICATIONS: &str = "/api/settings/notifications";
/// The route to add a category.
pub const SETTINGS_CATEGORIES: &str = "/api/settings/categories";
/// The route to remove a category.
pub const SETTINGS_CATEGORY: &str = "/api/settings/categories/{category}";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/budgets/{budget_id}', '{budget_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION_SUMMARY);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::BUDGETS);
        assert_endpoint_is_valid_uri(endpoints::BUDGET);
        assert_endpoint_is_valid_uri(endpoints::REPORTS);
        assert_endpoint_is_valid_uri(endpoints::REPORT_CHARTS);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_PDF);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_CSV);
        assert_endpoint_is_valid_uri(endpoints::SETTINGS);
        assert_endpoint_is_valid_uri(endpoints::SETTINGS_PROFILE);
        assert_endpoint_is_valid_uri(endpoints::SETTINGS_NOTIFICATIONS);
        assert_endpoint_is_valid_uri(endpoints::SETTINGS_CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::SETTINGS_CATEGORY);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        let formatted_path = format_endpoint(super::SETTINGS_CATEGORY, "Food");

        assert_eq!(formatted_path, "/api/settings/categories/Food");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
