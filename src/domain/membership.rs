use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stored lifecycle status of a membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Active => "active",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MembershipStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(MembershipStatus::Pending),
            "active" => Ok(MembershipStatus::Active),
            "expired" => Ok(MembershipStatus::Expired),
            "cancelled" | "canceled" => Ok(MembershipStatus::Cancelled),
            other => Err(anyhow!("unknown membership status: {}", other)),
        }
    }
}

/// A time-boxed entitlement to one package kind (pilates, free_gym, ...).
///
/// `is_active_flag` mirrors the legacy `is_active` column. It is carried so the
/// auditor can compare it against the derived state; access decisions never read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_kind: String,
    #[serde(default)]
    pub package_name: Option<String>,
    pub status: MembershipStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_active_flag: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// Derived activity for the given calendar day. Both date bounds are inclusive.
    pub fn is_effectively_active(&self, today: NaiveDate) -> bool {
        self.status == MembershipStatus::Active
            && self.deleted_at.is_none()
            && self.start_date <= today
            && today <= self.end_date
    }

    pub fn is_soft_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Credit ledger entry (class visits) attached to a membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: Uuid,
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub remaining: u32,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub is_active_flag: bool,
}

impl Deposit {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
