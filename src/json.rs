//! JSON request body helpers.

use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer, de};

use crate::Error;

/// Works like [axum::Json] but rejects bad bodies with [Error::InvalidJson],
/// so the client gets the same `{"message": ...}` shape as every other error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Deserialize an amount sent either as a JSON number or as a numeric string,
/// e.g. `42.5` or `"42.5"`.
///
/// Form inputs hand their values over as strings, so clients often send
/// amounts that way. Range checks are left to the form's `validate`.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(number) => Ok(number),
        NumberOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("\"{text}\" is not a valid amount"))),
    }
}
