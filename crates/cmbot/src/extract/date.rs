//! Reads the send date out of the email headers and moves it to the meeting day.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::CmBotError;
use crate::mail::Header;

const DATE_HEADER: &str = "Date";

/// Finds the `Date` header and parses its `[weekday,] day month year` prefix.
pub fn find_date(headers: &[Header]) -> Result<NaiveDate, CmBotError> {
    let header = headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(DATE_HEADER))
        .ok_or(CmBotError::NoDateHeader)?;

    parse_header_date(&header.value).ok_or_else(|| CmBotError::MalformedDateHeader {
        value: header.value.clone(),
    })
}

/// Parses e.g. `Mon, 21 Aug 2017 09:12:44 -0400` or `1 Sep 2017` into a date.
fn parse_header_date(value: &str) -> Option<NaiveDate> {
    let mut tokens = value.split_whitespace().peekable();

    // The day-of-week is optional in RFC 2822
    if tokens.peek()?.ends_with(',') {
        tokens.next();
    }

    let day = tokens.next()?;
    let month = tokens.next()?;
    let year = tokens.next()?;

    let day = zero_pad(day);
    NaiveDate::parse_from_str(&format!("{month} {day} {year}"), "%b %d %Y").ok()
}

fn zero_pad(day: &str) -> String {
    if day.len() == 1 {
        format!("0{day}")
    } else {
        day.to_string()
    }
}

/// Advances `date` until it falls on `weekday`.
///
/// The email sometimes goes out a few days before the meeting, so the send date
/// is moved forward to the meeting's weekday. A date already on `weekday` is
/// returned unchanged.
pub fn correct_date(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7;
    date + Days::new(u64::from(ahead))
}
