use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use crate::Error;

/// `YYYY-MM-DD`, the format of the stored `date` column and of every response key
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Request dates may leave month and day unpadded, e.g. `2016-8-31`
const PATH_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month padding:none]-[day padding:none]");

/// Parse a `YYYY-MM-DD` string as stored in the observation tables
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, DATE_FORMAT)
}

pub fn format_date(date: Date) -> String {
    // only year/month/day components, all of which a Date carries
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a date taken from a request path.
///
/// Literal `%20` sequences are replaced with `-` before parsing, which keeps
/// old links such as `/api/v1.0/2016%2008-31` working. The router percent
/// decodes path segments, so the decoded form (a space) is accepted too.
pub fn parse_path_date(segment: &str) -> Result<Date, Error> {
    let normalized = segment.trim().replace("%20", "-").replace(' ', "-");
    Date::parse(&normalized, PATH_DATE_FORMAT)
        .map_err(|_| Error::InvalidDateFormat(segment.to_string()))
}
