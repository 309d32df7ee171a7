//! User settings: profile, notification flags and the category list.

mod core;
mod handlers;

pub use core::{
    CategoryForm, DEFAULT_SETTINGS_KEY, Notifications, Profile, ProfileForm, Settings,
    add_category, create_settings_table, get_or_create_settings, remove_category,
    update_notifications, update_profile,
};
pub use handlers::{
    add_category_endpoint, get_settings_endpoint, remove_category_endpoint,
    update_notifications_endpoint, update_profile_endpoint,
};
