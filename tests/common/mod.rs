pub mod factories;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Fixed reference instant so date arithmetic in tests is reproducible.
#[allow(dead_code)]
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn reference_today() -> NaiveDate {
    reference_now().date_naive()
}
