use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use indexmap::IndexMap;

pub const DEFAULT_SINCE_DAYS: u32 = 30;

/// `last_activity_at` as the hosting platform formats it, e.g.
/// `2024-01-01T00:00:00.000000Z`. `%.f` alone also takes a missing or
/// nanosecond fraction, see `fraction_digits`.
const ACTIVITY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Fractional seconds must be present, 1 to 6 digits.
const MAX_FRACTION_DIGITS: usize = 6;

pub fn parse_activity(path: &str, value: &str) -> Result<DateTime<Utc>> {
    let parsed = NaiveDateTime::parse_from_str(value, ACTIVITY_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| Error::Timestamp {
            path: path.to_string(),
            value: value.to_string(),
            source,
        })?;

    match fraction_digits(value) {
        Some(1..=MAX_FRACTION_DIGITS) => Ok(parsed),
        _ => Err(Error::TimestampFraction {
            path: path.to_string(),
            value: value.to_string(),
        }),
    }
}

fn fraction_digits(value: &str) -> Option<usize> {
    let (_, fraction) = value.strip_suffix('Z')?.rsplit_once('.')?;
    fraction
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then_some(fraction.len())
}

/// Keep projects active strictly after `now - days`.
pub fn filter_recent_projects(
    activity: &IndexMap<String, Option<String>>,
    days: u32,
) -> Result<IndexMap<String, String>> {
    filter_recent_at(activity, days, Utc::now())
}

/// Same as [`filter_recent_projects`] against a fixed clock.
///
/// Any missing or malformed timestamp fails the whole pass.
pub fn filter_recent_at(
    activity: &IndexMap<String, Option<String>>,
    days: u32,
    now: DateTime<Utc>,
) -> Result<IndexMap<String, String>> {
    let cutoff = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .ok_or(Error::DateRange(days))?;

    let mut recent = IndexMap::new();
    for (path, last_activity) in activity {
        let raw = last_activity
            .as_deref()
            .ok_or_else(|| Error::MissingTimestamp(path.clone()))?;
        if parse_activity(path, raw)? > cutoff {
            recent.insert(path.clone(), raw.to_string());
        }
    }
    Ok(recent)
}
