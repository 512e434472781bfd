use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::constants::{EXPIRY_IMMINENT_DAYS, EXPIRY_SOON_DAYS, EXPIRY_UPCOMING_DAYS};
use crate::domain::Membership;

/// Calendar day of `now` in UTC. All date-range checks compare against this.
pub fn today_utc(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Days from `today` to the membership's last valid day. Negative once expired.
pub fn days_until_expiry(membership: &Membership, today: NaiveDate) -> i64 {
    (membership.end_date - today).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "days", rename_all = "snake_case")]
pub enum ExpiryWarning {
    Expired,
    ExpiresToday,
    Imminent(i64),
    Soon(i64),
    Upcoming(i64),
}

pub fn expiry_warning(membership: &Membership, today: NaiveDate) -> Option<ExpiryWarning> {
    let days = days_until_expiry(membership, today);

    match days {
        d if d < 0 => Some(ExpiryWarning::Expired),
        0 => Some(ExpiryWarning::ExpiresToday),
        d if d <= EXPIRY_IMMINENT_DAYS => Some(ExpiryWarning::Imminent(d)),
        d if d <= EXPIRY_SOON_DAYS => Some(ExpiryWarning::Soon(d)),
        d if d <= EXPIRY_UPCOMING_DAYS => Some(ExpiryWarning::Upcoming(d)),
        _ => None,
    }
}
