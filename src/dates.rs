//! Date parsing and the ISO date format used on the wire.

use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

// Serializes dates as "YYYY-MM-DD" strings in JSON.
time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

pub(crate) use iso_date::{deserialize as deserialize_iso_date, serialize as serialize_iso_date};

/// Parse a calendar date from either `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// Timestamps are converted to UTC before the time of day is dropped, so
/// `2024-01-01T23:30:00-05:00` becomes `2024-01-02`.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` matches neither format.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, ISO_DATE_FORMAT) {
        return Ok(date);
    }

    OffsetDateTime::parse(text, &Rfc3339)
        .map(|timestamp| timestamp.to_offset(UtcOffset::UTC).date())
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::Error;

    use super::parse_date;

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_date("2024-01-31"), Ok(date!(2024 - 01 - 31)));
    }

    #[test]
    fn parses_timestamp_as_utc_date() {
        assert_eq!(
            parse_date("2024-01-01T23:30:00-05:00"),
            Ok(date!(2024 - 01 - 02))
        );
        assert_eq!(parse_date("2024-03-05T08:00:00Z"), Ok(date!(2024 - 03 - 05)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            parse_date("last tuesday"),
            Err(Error::InvalidDate("last tuesday".to_owned()))
        );
    }
}
