//! Display currencies and currency formatting.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The currency amounts are displayed in.
///
/// This only changes the symbol, amounts are never converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    /// Indian rupee.
    #[default]
    #[serde(rename = "INR")]
    Inr,
    /// US dollar.
    #[serde(rename = "USD")]
    Usd,
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// The ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// The symbol placed in front of amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => Err(Error::InvalidCurrency(other.to_owned())),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Format `number` with the currency symbol, thousands separators and two
/// decimal places, e.g. "₹1,234.50" or "-$3.10".
///
/// The amount is rounded half away from zero to the nearest cent, so
/// `999.999` is "1,000.00" and `0.004` is "0.00".
pub fn format_currency(number: f64, currency: Currency) -> String {
    let cents = (number * 100.0).round();
    // Rounding can leave -0.0, which should not get a minus sign.
    let sign = if cents < 0.0 { "-" } else { "" };
    let digits = format!("{:.2}", cents.abs() / 100.0);

    format!("{sign}{}{}", currency.symbol(), group_thousands(&digits))
}

/// Insert a comma every three digits of the integer part of `digits`.
fn group_thousands(digits: &str) -> String {
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let mut grouped = String::with_capacity(digits.len() + integer.len() / 3);

    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    grouped
}
