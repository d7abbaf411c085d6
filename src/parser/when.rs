//! Timezone lookup and `when` resolution.

use crate::error::ScheduleError;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde_json::Value;

/// Local date-time layouts accepted without an offset.
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts that RFC 3339 parsing does not cover.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

pub fn resolve_timezone(name: Option<&str>) -> Result<Tz, ScheduleError> {
    let name = match name.map(str::trim) {
        Some(n) if !n.is_empty() => n,
        _ => return Err(ScheduleError::UnspecifiedTimezone),
    };
    name.parse::<Tz>()
        .map_err(|_| ScheduleError::UnknownTimezone(name.to_string()))
}

/// Interpret a raw `when` value in `tz`. `None` means the value is unusable.
///
/// Strings with an offset keep their instant; strings without one are local
/// time in `tz`. Non-zero integers are epoch milliseconds; `0` counts as
/// unset.
pub fn resolve(raw: &Value, tz: Tz) -> Option<DateTime<Tz>> {
    match raw {
        Value::String(s) => parse_text(s.trim(), tz),
        Value::Number(n) => n
            .as_i64()
            .filter(|&ms| ms != 0)
            .and_then(|ms| tz.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn parse_text(s: &str, tz: Tz) -> Option<DateTime<Tz>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&tz));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&tz));
        }
    }

    for fmt in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, tz);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return localize(date.and_hms_opt(0, 0, 0)?, tz);
    }
    None
}

/// Ambiguous local times take the earlier instant; times inside a DST gap
/// move forward an hour.
fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
    })
}
