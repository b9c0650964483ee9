//! Envelope timestamp formatting.
//!
//! Tagged-text documents carry their generation time as UTC
//! `YYYY-MM-DD HH:MM:SS` (proleptic Gregorian calendar).

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ValueFormatError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Returns the current Unix time in whole seconds.
///
/// Clocks set before 1970 report 0.
pub fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Formats Unix seconds as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(unix_secs: i64) -> String {
    let days = unix_secs.div_euclid(SECONDS_PER_DAY);
    let secs = unix_secs.rem_euclid(SECONDS_PER_DAY);
    let (year, month, day) = days_to_date(days);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        secs / 3600,
        secs % 3600 / 60,
        secs % 60
    )
}

/// Parses `YYYY-MM-DD HH:MM:SS` (UTC) back into Unix seconds.
pub fn parse_timestamp(text: &str) -> Result<i64, ValueFormatError> {
    let err = |reason| ValueFormatError::new("timestamp", text, reason);
    let bytes = text.as_bytes();
    if !text.is_ascii()
        || bytes.len() != 19
        || bytes[4] != b'-'
        || bytes[7] != b'-'
        || bytes[10] != b' '
        || bytes[13] != b':'
        || bytes[16] != b':'
    {
        return Err(err("expected YYYY-MM-DD HH:MM:SS"));
    }
    let num = |range: std::ops::Range<usize>| -> Result<u32, ValueFormatError> {
        let part = &text[range];
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("expected decimal digits"));
        }
        part.parse().map_err(|_| err("expected decimal digits"))
    };
    let (year, month, day) = (num(0..4)?, num(5..7)?, num(8..10)?);
    let (hour, minute, second) = (num(11..13)?, num(14..16)?, num(17..19)?);

    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
        return Err(err("date out of range"));
    }
    if hour > 23 || minute > 59 || second > 59 {
        return Err(err("time out of range"));
    }
    let days = date_to_days(year as i64, month, day);
    Ok(days * SECONDS_PER_DAY + i64::from(hour * 3600 + minute * 60 + second))
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Converts a civil date to days since the Unix epoch (Howard Hinnant).
fn date_to_days(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let m = if month <= 2 { month + 9 } else { month - 3 };

    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as u32; // year of era
    let doy = (153 * m + 2) / 5 + day - 1; // day of year
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // day of era

    era * 146_097 + i64::from(doe) - 719_468
}

/// Converts days since the Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u32; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365; // year of era
    let y = i64::from(yoe) + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };

    (if m <= 2 { y + 1 } else { y }, m, d)
}
