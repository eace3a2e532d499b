//! Lenient calendar timestamp recognition for `Date` and `DateTime` fields.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{
        BorrowedFormatItem,
        well_known::{Iso8601, Rfc3339},
    },
    macros::format_description,
};

const LOCAL_T_SEPARATED: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const LOCAL_SPACE_SEPARATED: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const CALENDAR_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Whether `text` is an RFC 3339 or ISO 8601 timestamp, a local
/// `YYYY-MM-DDTHH:MM:SS` timestamp, or a plain `YYYY-MM-DD` date.
pub(crate) fn is_timestamp(text: &str) -> bool {
    let trimmed = text.trim();
    OffsetDateTime::parse(trimmed, &Rfc3339).is_ok()
        || OffsetDateTime::parse(trimmed, &Iso8601::DEFAULT).is_ok()
        || PrimitiveDateTime::parse(trimmed, &Iso8601::DEFAULT).is_ok()
        || PrimitiveDateTime::parse(trimmed, LOCAL_T_SEPARATED).is_ok()
        || PrimitiveDateTime::parse(trimmed, LOCAL_SPACE_SEPARATED).is_ok()
        || Date::parse(trimmed, CALENDAR_DATE).is_ok()
}
