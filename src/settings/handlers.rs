//! Route handlers for the settings document.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    app_state::{DatabaseState, lock_connection},
    json::JsonBody,
    settings::{
        CategoryForm, DEFAULT_SETTINGS_KEY, Notifications, Profile, ProfileForm, Settings,
        add_category, get_or_create_settings, remove_category, update_notifications,
        update_profile,
    },
};

/// A route handler for getting the settings, created with defaults on first use.
pub async fn get_settings_endpoint(
    State(state): State<DatabaseState>,
) -> Result<Json<Settings>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_or_create_settings(DEFAULT_SETTINGS_KEY, &connection)
        .inspect_err(|error| tracing::error!("Could not get settings: {error}"))
        .map(Json)
}

/// A route handler for replacing the profile. Responds with the new profile.
pub async fn update_profile_endpoint(
    State(state): State<DatabaseState>,
    JsonBody(form): JsonBody<ProfileForm>,
) -> Result<Json<Profile>, Error> {
    let profile = form.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_profile(DEFAULT_SETTINGS_KEY, profile, &connection)
        .inspect_err(|error| tracing::error!("Could not update profile: {error}"))
        .map(|settings| Json(settings.profile))
}

/// A route handler for replacing the notification flags. Responds with the
/// new flags.
///
/// Flags missing from the body take their default values.
pub async fn update_notifications_endpoint(
    State(state): State<DatabaseState>,
    JsonBody(notifications): JsonBody<Notifications>,
) -> Result<Json<Notifications>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_notifications(DEFAULT_SETTINGS_KEY, notifications, &connection)
        .inspect_err(|error| tracing::error!("Could not update notifications: {error}"))
        .map(|settings| Json(settings.notifications))
}

/// A route handler for adding a category. Responds with the category list.
pub async fn add_category_endpoint(
    State(state): State<DatabaseState>,
    JsonBody(form): JsonBody<CategoryForm>,
) -> Result<Json<Vec<String>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    add_category(DEFAULT_SETTINGS_KEY, &form.category, &connection).map(Json)
}

/// A route handler for removing a category. Responds with the remaining categories.
pub async fn remove_category_endpoint(
    State(state): State<DatabaseState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<String>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    remove_category(DEFAULT_SETTINGS_KEY, &category, &connection)
        .inspect_err(|error| tracing::error!("Could not remove category {category}: {error}"))
        .map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;

    use crate::{
        Error,
        app_state::DatabaseState,
        currency::Currency,
        db::initialize,
        json::JsonBody,
        settings::{CategoryForm, Notifications, ProfileForm},
    };

    use super::{
        add_category_endpoint, get_settings_endpoint, remove_category_endpoint,
        update_notifications_endpoint, update_profile_endpoint,
    };

    fn get_test_state() -> DatabaseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DatabaseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn profile_update_is_returned_by_get() {
        let state = get_test_state();

        let profile = update_profile_endpoint(
            State(state.clone()),
            JsonBody(ProfileForm {
                name: "Sam".to_owned(),
                email: "sam@example.com".to_owned(),
                currency: "USD".to_owned(),
            }),
        )
        .await
        .unwrap()
        .0;
        let settings = get_settings_endpoint(State(state)).await.unwrap().0;

        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.currency, Currency::Usd);
        assert_eq!(settings.profile, profile);
    }

    #[tokio::test]
    async fn notifications_update_responds_with_flags_only() {
        let state = get_test_state();
        let flags = Notifications {
            email_alerts: true,
            budget_alerts: false,
            weekly_report: true,
        };

        let updated = update_notifications_endpoint(State(state.clone()), JsonBody(flags))
            .await
            .unwrap()
            .0;
        let settings = get_settings_endpoint(State(state)).await.unwrap().0;

        assert_eq!(updated, flags);
        assert_eq!(settings.notifications, flags);
    }

    #[tokio::test]
    async fn invalid_currency_is_rejected() {
        let result = update_profile_endpoint(
            State(get_test_state()),
            JsonBody(ProfileForm {
                name: "Sam".to_owned(),
                email: "sam@example.com".to_owned(),
                currency: "JPY".to_owned(),
            }),
        )
        .await;

        assert_eq!(
            result.map(|json| json.0),
            Err(Error::InvalidCurrency("JPY".to_owned()))
        );
    }

    #[tokio::test]
    async fn add_then_remove_category() {
        let state = get_test_state();

        let added = add_category_endpoint(
            State(state.clone()),
            JsonBody(CategoryForm {
                category: "Pets".to_owned(),
            }),
        )
        .await
        .unwrap()
        .0;
        let removed = remove_category_endpoint(State(state), Path("Pets".to_owned()))
            .await
            .unwrap()
            .0;

        assert!(added.contains(&"Pets".to_owned()));
        assert!(!removed.contains(&"Pets".to_owned()));
    }
}
