//! The settings document and its storage.
//!
//! Settings are stored as a single JSON document per key. There are no user
//! accounts, so the server always uses [DEFAULT_SETTINGS_KEY].

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{Error, currency::Currency};

/// The key the server stores its settings under.
pub const DEFAULT_SETTINGS_KEY: &str = "default";

/// The categories a new settings document starts with.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Food",
    "Transportation",
    "Housing",
    "Utilities",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Other",
];

/// Who the tracker belongs to and how amounts are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The currency symbol used when displaying amounts.
    pub currency: Currency,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "User".to_owned(),
            email: "user@example.com".to_owned(),
            currency: Currency::default(),
        }
    }
}

/// Which notifications the user wants.
///
/// Flags missing from a JSON body take their [Default] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notifications {
    /// Send general alerts by email.
    pub email_alerts: bool,
    /// Alert when a budget is close to or over its ceiling.
    pub budget_alerts: bool,
    /// Send a weekly report.
    pub weekly_report: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            email_alerts: false,
            budget_alerts: true,
            weekly_report: false,
        }
    }
}

/// The user's preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Name, email and display currency.
    #[serde(default)]
    pub profile: Profile,
    /// Notification flags.
    #[serde(default)]
    pub notifications: Notifications,
    /// The categories offered when recording transactions and budgets.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            notifications: Notifications::default(),
            categories: default_categories(),
        }
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|category| (*category).to_owned())
        .collect()
}

/// The JSON body for replacing the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileForm {
    /// The user's display name.
    #[serde(default)]
    pub name: String,
    /// The user's email address.
    #[serde(default)]
    pub email: String,
    /// One of "INR", "USD" or "EUR".
    #[serde(default)]
    pub currency: String,
}

impl ProfileForm {
    /// Convert the form into a [Profile]. Name and email are trimmed.
    ///
    /// # Errors
    /// Returns the first validation error found, in field order:
    /// [Error::EmptyName], [Error::EmptyEmail], [Error::InvalidCurrency].
    pub fn validate(self) -> Result<Profile, Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::EmptyEmail);
        }

        let currency = self.currency.trim().parse()?;

        Ok(Profile {
            name: name.to_owned(),
            email: email.to_owned(),
            currency,
        })
    }
}

/// The JSON body for adding a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The category to add.
    #[serde(default)]
    pub category: String,
}

/// Get the settings stored under `key`, storing the defaults first if there
/// are none yet.
///
/// # Errors
/// Returns an [Error::SqlError] if there is some SQL error, or an
/// [Error::JSONSerializationError] if the stored document cannot be read.
pub fn get_or_create_settings(key: &str, connection: &Connection) -> Result<Settings, Error> {
    let document: Option<String> = connection
        .query_row(
            "SELECT document FROM settings WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;

    match document {
        Some(document) => serde_json::from_str(&document)
            .map_err(|error| Error::JSONSerializationError(error.to_string())),
        None => {
            let settings = Settings::default();
            save_settings(key, &settings, connection)?;
            tracing::info!("Created default settings for \"{key}\"");
            Ok(settings)
        }
    }
}

/// Store `settings` under `key`, replacing anything already there.
///
/// # Errors
/// Returns an [Error::SqlError] if there is some SQL error, or an
/// [Error::JSONSerializationError] if the settings cannot be serialized.
pub fn save_settings(key: &str, settings: &Settings, connection: &Connection) -> Result<(), Error> {
    let document = serde_json::to_string(settings)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    connection.execute(
        "INSERT INTO settings (key, document) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET document = excluded.document",
        (key, document),
    )?;

    Ok(())
}

/// Replace the profile and return the updated settings.
///
/// # Errors
/// See [get_or_create_settings] and [save_settings].
pub fn update_profile(
    key: &str,
    profile: Profile,
    connection: &Connection,
) -> Result<Settings, Error> {
    let mut settings = get_or_create_settings(key, connection)?;
    settings.profile = profile;
    save_settings(key, &settings, connection)?;

    Ok(settings)
}

/// Replace the notification flags and return the updated settings.
///
/// # Errors
/// See [get_or_create_settings] and [save_settings].
pub fn update_notifications(
    key: &str,
    notifications: Notifications,
    connection: &Connection,
) -> Result<Settings, Error> {
    let mut settings = get_or_create_settings(key, connection)?;
    settings.notifications = notifications;
    save_settings(key, &settings, connection)?;

    Ok(settings)
}

/// Add a category if it is not already in the list and return the list.
///
/// The category is trimmed first. Adding an existing category is not an error.
///
/// # Errors
/// Returns [Error::EmptyCategory] if the category is empty, otherwise see
/// [get_or_create_settings] and [save_settings].
pub fn add_category(
    key: &str,
    category: &str,
    connection: &Connection,
) -> Result<Vec<String>, Error> {
    let category = category.trim();
    if category.is_empty() {
        return Err(Error::EmptyCategory);
    }

    let mut settings = get_or_create_settings(key, connection)?;

    if !settings.categories.iter().any(|existing| existing == category) {
        settings.categories.push(category.to_owned());
        save_settings(key, &settings, connection)?;
    }

    Ok(settings.categories)
}

/// Remove a category and return the remaining list.
///
/// Removing a category that is not in the list is not an error.
///
/// # Errors
/// See [get_or_create_settings] and [save_settings].
pub fn remove_category(
    key: &str,
    category: &str,
    connection: &Connection,
) -> Result<Vec<String>, Error> {
    let mut settings = get_or_create_settings(key, connection)?;

    let count_before = settings.categories.len();
    settings.categories.retain(|existing| existing != category);

    if settings.categories.len() != count_before {
        save_settings(key, &settings, connection)?;
    }

    Ok(settings.categories)
}

/// Create the settings table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                document TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}
