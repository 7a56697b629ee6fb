// Ban durations and unban timestamp arithmetic.
//
// The platform takes the unban moment as Unix seconds rendered in decimal,
// or an empty string for a ban that never expires.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

/// How long a ban lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    /// No end date.
    Permanent,
    /// Fixed number of seconds from the moment the unban date is computed.
    Seconds(u64),
    /// Until Dec 31, 23:59:59 of the current year, local time.
    EndOfYear,
}

impl Term {
    /// `0` is the permanent-ban sentinel used by the data document.
    pub fn from_seconds(seconds: u64) -> Self {
        if seconds == 0 {
            Term::Permanent
        } else {
            Term::Seconds(seconds)
        }
    }
}

/// A selectable duration: display title plus its term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanDuration {
    pub title: String,
    pub term: Term,
}

/// Compute the `end_date` value for a ban starting at `now`.
pub fn unban_date<Tz: TimeZone>(term: Term, now: &DateTime<Tz>) -> String {
    match term {
        Term::Permanent => String::new(),
        Term::Seconds(seconds) => now.timestamp().saturating_add_unsigned(seconds).to_string(),
        Term::EndOfYear => end_of_year(now).to_string(),
    }
}

/// Unix timestamp of Dec 31, 23:59:59 in the year and zone of `now`.
pub fn end_of_year<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    // Only missing past the last year chrono can represent.
    let Some(last_second) =
        NaiveDate::from_ymd_opt(now.year(), 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59))
    else {
        return i64::MAX;
    };

    // Ambiguous local times take the first occurrence; a skipped one falls
    // back to reading the wall clock as UTC.
    match now.timezone().from_local_datetime(&last_second).earliest() {
        Some(dt) => dt.timestamp(),
        None => last_second.and_utc().timestamp(),
    }
}
