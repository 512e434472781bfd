use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::MembershipStatus;

/// A disagreement between a stored activity flag and the derived truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// `status = active` while `end_date` is already in the past.
    StaleActiveMembership {
        membership_id: Uuid,
        user_id: Uuid,
        end_date: NaiveDate,
        days_overdue: i64,
    },
    /// Deposit flagged active after `expires_at`.
    StaleActiveDeposit {
        deposit_id: Uuid,
        membership_id: Uuid,
        expires_at: DateTime<Utc>,
        overdue_secs: i64,
    },
    /// `is_active` column and `status` column disagree.
    FlagMismatch {
        membership_id: Uuid,
        status: MembershipStatus,
        is_active_flag: bool,
    },
    /// `status = expired` although the date range has not ended.
    PrematureExpiry {
        membership_id: Uuid,
        end_date: NaiveDate,
        days_remaining: i64,
    },
    /// Deposit pointing at a membership that is not in the store.
    OrphanDeposit {
        deposit_id: Uuid,
        membership_id: Uuid,
    },
}

impl Anomaly {
    pub fn kind(&self) -> &'static str {
        match self {
            Anomaly::StaleActiveMembership { .. } => "stale_active_membership",
            Anomaly::StaleActiveDeposit { .. } => "stale_active_deposit",
            Anomaly::FlagMismatch { .. } => "flag_mismatch",
            Anomaly::PrematureExpiry { .. } => "premature_expiry",
            Anomaly::OrphanDeposit { .. } => "orphan_deposit",
        }
    }

    pub fn overdue(&self) -> Option<Duration> {
        match self {
            Anomaly::StaleActiveMembership { days_overdue, .. } => {
                Some(Duration::days(*days_overdue))
            }
            Anomaly::StaleActiveDeposit { overdue_secs, .. } => {
                Some(Duration::seconds(*overdue_secs))
            }
            _ => None,
        }
    }
}
