use crate::domain::{Anomaly, Deposit, Membership, MembershipStatus};
use crate::repository::MembershipRepository;
use crate::services::dates::{days_until_expiry, today_utc};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Extra consistency checks on top of the two stale-flag checks, all off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOptions {
    pub flag_mismatch: bool,
    pub premature_expiry: bool,
    pub orphan_deposits: bool,
}

impl AuditOptions {
    pub fn all() -> Self {
        Self {
            flag_mismatch: true,
            premature_expiry: true,
            orphan_deposits: true,
        }
    }
}

/// Reports rows whose stored "active" flag contradicts the derived state.
pub fn find_anomalies(
    memberships: &[Membership],
    deposits: &[Deposit],
    now: DateTime<Utc>,
) -> Vec<Anomaly> {
    find_anomalies_with(memberships, deposits, now, &AuditOptions::default())
}

pub fn find_anomalies_with(
    memberships: &[Membership],
    deposits: &[Deposit],
    now: DateTime<Utc>,
    options: &AuditOptions,
) -> Vec<Anomaly> {
    let today = today_utc(now);
    let mut anomalies = Vec::new();

    for m in memberships {
        let days_left = days_until_expiry(m, today);

        if m.status == MembershipStatus::Active && days_left < 0 {
            anomalies.push(Anomaly::StaleActiveMembership {
                membership_id: m.id,
                user_id: m.user_id,
                end_date: m.end_date,
                days_overdue: -days_left,
            });
        }

        if options.flag_mismatch && m.is_active_flag != (m.status == MembershipStatus::Active) {
            anomalies.push(Anomaly::FlagMismatch {
                membership_id: m.id,
                status: m.status,
                is_active_flag: m.is_active_flag,
            });
        }

        if options.premature_expiry && m.status == MembershipStatus::Expired && days_left >= 0 {
            anomalies.push(Anomaly::PrematureExpiry {
                membership_id: m.id,
                end_date: m.end_date,
                days_remaining: days_left,
            });
        }
    }

    let known: HashSet<Uuid> = if options.orphan_deposits {
        memberships.iter().map(|m| m.id).collect()
    } else {
        HashSet::new()
    };

    for d in deposits {
        if d.is_active_flag && d.is_expired(now) {
            anomalies.push(Anomaly::StaleActiveDeposit {
                deposit_id: d.id,
                membership_id: d.membership_id,
                expires_at: d.expires_at,
                overdue_secs: (now - d.expires_at).num_seconds(),
            });
        }

        if options.orphan_deposits && !known.contains(&d.membership_id) {
            anomalies.push(Anomaly::OrphanDeposit {
                deposit_id: d.id,
                membership_id: d.membership_id,
            });
        }
    }

    anomalies
}

/// Number of findings per anomaly kind.
pub fn summarize(anomalies: &[Anomaly]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for a in anomalies {
        *counts.entry(a.kind()).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone)]
pub struct IntegrityService<R: MembershipRepository> {
    pub repo: Arc<R>,
}

impl<R: MembershipRepository> IntegrityService<R> {
    /// Creates a new `IntegrityService` instance.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Scans the whole store. Read-only; safe to run at any frequency.
    pub async fn audit(&self, now: DateTime<Utc>, options: &AuditOptions) -> Result<Vec<Anomaly>> {
        let memberships = self
            .repo
            .list_memberships()
            .await
            .context("Failed to load memberships for audit")?;
        let deposits = self
            .repo
            .list_deposits()
            .await
            .context("Failed to load deposits for audit")?;

        let anomalies = find_anomalies_with(&memberships, &deposits, now, options);

        if anomalies.is_empty() {
            tracing::info!(
                "Audit clean: {} memberships, {} deposits",
                memberships.len(),
                deposits.len()
            );
        } else {
            for (kind, count) in summarize(&anomalies) {
                tracing::warn!("Audit found {} {} anomalies", count, kind);
            }
        }

        Ok(anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 8, 0, 0).unwrap()
    }

    fn membership(status: MembershipStatus, end_offset: i64, flag: bool) -> Membership {
        let today = now().date_naive();
        Membership {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            package_kind: "pilates".to_string(),
            package_name: None,
            status,
            start_date: today - Duration::days(60),
            end_date: today + Duration::days(end_offset),
            is_active_flag: flag,
            deleted_at: None,
        }
    }

    #[test]
    fn test_stale_membership_days_overdue() {
        let stale = membership(MembershipStatus::Active, -3, true);
        let anomalies = find_anomalies(&[stale.clone()], &[], now());

        assert_eq!(
            anomalies,
            vec![Anomaly::StaleActiveMembership {
                membership_id: stale.id,
                user_id: stale.user_id,
                end_date: stale.end_date,
                days_overdue: 3,
            }]
        );
    }

    #[test]
    fn test_default_options_skip_extra_checks() {
        let mismatch = membership(MembershipStatus::Active, 10, false);
        let premature = membership(MembershipStatus::Expired, 10, false);

        assert!(find_anomalies(&[mismatch, premature], &[], now()).is_empty());
    }

    #[test]
    fn test_extra_checks() {
        let mismatch = membership(MembershipStatus::Cancelled, 10, true);
        let premature = membership(MembershipStatus::Expired, 4, false);
        let orphan = Deposit {
            id: Uuid::new_v4(),
            membership_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            remaining: 2,
            expires_at: now() + Duration::days(5),
            is_active_flag: false,
        };

        let anomalies = find_anomalies_with(
            &[mismatch.clone(), premature.clone()],
            &[orphan.clone()],
            now(),
            &AuditOptions::all(),
        );

        assert_eq!(
            anomalies,
            vec![
                Anomaly::FlagMismatch {
                    membership_id: mismatch.id,
                    status: MembershipStatus::Cancelled,
                    is_active_flag: true,
                },
                Anomaly::PrematureExpiry {
                    membership_id: premature.id,
                    end_date: premature.end_date,
                    days_remaining: 4,
                },
                Anomaly::OrphanDeposit {
                    deposit_id: orphan.id,
                    membership_id: orphan.membership_id,
                },
            ]
        );
    }

    #[test]
    fn test_summarize() {
        let a = membership(MembershipStatus::Active, -1, true);
        let b = membership(MembershipStatus::Active, -9, true);
        let anomalies = find_anomalies(&[a, b], &[], now());

        let counts = summarize(&anomalies);
        assert_eq!(counts.get("stale_active_membership"), Some(&2));
        assert_eq!(counts.len(), 1);
    }
}
