use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Asia::Tokyo;
use chrono_tz::Tz;

/// All civil dates in this system are resolved against the operator's
/// timezone, never the host's.
pub const BUSINESS_TZ: Tz = Tokyo;

pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&BUSINESS_TZ).date_naive()
}

pub fn today_plus(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn date_range_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date <= end)
}
