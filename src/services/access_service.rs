use crate::domain::{AccessState, Checkpoint, Deposit, Membership};
use crate::repository::MembershipRepository;
use crate::services::dates::{ExpiryWarning, days_until_expiry, expiry_warning, today_utc};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Memberships that grant access on `today`, ignoring the stored `is_active` flag.
pub fn effectively_active(memberships: &[Membership], today: NaiveDate) -> Vec<&Membership> {
    memberships
        .iter()
        .filter(|m| m.is_effectively_active(today))
        .collect()
}

/// Reduces one user's rows to their access at `now`.
///
/// Every effectively-active membership contributes its package kind, so
/// renewals and overlapping purchases of the same kind are a union rather
/// than "the latest one wins". Deposits are summed per kind without merging.
/// A deposit whose membership is missing, inactive, or owned by a different
/// user contributes nothing.
pub fn evaluate_access(
    memberships: &[Membership],
    deposits: &[Deposit],
    now: DateTime<Utc>,
) -> AccessState {
    let today = today_utc(now);
    let active: HashMap<Uuid, &Membership> = effectively_active(memberships, today)
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let mut state = AccessState::default();
    for membership in active.values() {
        state.categories.insert(membership.package_kind.clone());
    }
    state.has_any_access = !state.categories.is_empty();

    for deposit in deposits {
        if deposit.remaining == 0 || now > deposit.expires_at {
            continue;
        }
        let Some(owner) = active.get(&deposit.membership_id) else {
            continue;
        };
        if owner.user_id != deposit.user_id {
            continue;
        }

        *state
            .credits_by_category
            .entry(owner.package_kind.clone())
            .or_insert(0) += u64::from(deposit.remaining);
    }

    state
}

/// Evaluates access at `start + offset` days for each offset, in the given order.
/// Offsets that land outside the representable date range are skipped.
pub fn evaluate_timeline(
    memberships: &[Membership],
    deposits: &[Deposit],
    start: DateTime<Utc>,
    offsets_days: &[i64],
) -> Vec<Checkpoint> {
    offsets_days
        .iter()
        .filter_map(|&offset_days| {
            let Some(at) = Duration::try_days(offset_days)
                .and_then(|delta| start.checked_add_signed(delta))
            else {
                tracing::warn!(
                    "Skipping checkpoint: {} days from {} is out of range",
                    offset_days,
                    start
                );
                return None;
            };
            Some(Checkpoint {
                offset_days,
                at,
                access: evaluate_access(memberships, deposits, at),
            })
        })
        .collect()
}

/// Remaining validity of one active membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryNotice {
    pub membership_id: Uuid,
    pub package_kind: String,
    pub end_date: NaiveDate,
    pub days_left: i64,
    pub warning: Option<ExpiryWarning>,
}

/// Expiry notices for the memberships active at `now`, soonest first.
pub fn expiry_notices(memberships: &[Membership], now: DateTime<Utc>) -> Vec<ExpiryNotice> {
    let today = today_utc(now);
    let mut notices: Vec<ExpiryNotice> = effectively_active(memberships, today)
        .into_iter()
        .map(|m| ExpiryNotice {
            membership_id: m.id,
            package_kind: m.package_kind.clone(),
            end_date: m.end_date,
            days_left: days_until_expiry(m, today),
            warning: expiry_warning(m, today),
        })
        .collect();
    notices.sort_by(|a, b| {
        a.end_date
            .cmp(&b.end_date)
            .then_with(|| a.membership_id.cmp(&b.membership_id))
    });
    notices
}

#[derive(Debug, Clone)]
pub struct AccessService<R: MembershipRepository> {
    pub repo: Arc<R>,
}

impl<R: MembershipRepository> AccessService<R> {
    /// Creates a new `AccessService` instance.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn load_user_rows(&self, user_id: Uuid) -> Result<(Vec<Membership>, Vec<Deposit>)> {
        let memberships = self
            .repo
            .list_user_memberships(user_id)
            .await
            .with_context(|| format!("Failed to load memberships for user {}", user_id))?;
        let deposits = self
            .repo
            .list_user_deposits(user_id)
            .await
            .with_context(|| format!("Failed to load deposits for user {}", user_id))?;
        Ok((memberships, deposits))
    }

    /// Fetches a user's rows and evaluates their access at `now`.
    pub async fn evaluate_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<AccessState> {
        let (memberships, deposits) = self.load_user_rows(user_id).await?;
        let state = evaluate_access(&memberships, &deposits, now);

        tracing::debug!(
            "User {}: {} memberships, {} deposits -> categories {:?}, credits {:?}",
            user_id,
            memberships.len(),
            deposits.len(),
            state.categories,
            state.credits_by_category
        );
        if !state.has_any_access && !memberships.is_empty() {
            tracing::info!(
                "User {} has {} memberships but none active on {}",
                user_id,
                memberships.len(),
                today_utc(now)
            );
        }

        Ok(state)
    }

    /// Access state and expiry notices from a single fetch of the user's rows.
    pub async fn access_summary(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(AccessState, Vec<ExpiryNotice>)> {
        let (memberships, deposits) = self.load_user_rows(user_id).await?;
        Ok((
            evaluate_access(&memberships, &deposits, now),
            expiry_notices(&memberships, now),
        ))
    }

    /// Fetches a user's rows once and evaluates them at each checkpoint.
    pub async fn timeline(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        offsets_days: &[i64],
    ) -> Result<Vec<Checkpoint>> {
        let (memberships, deposits) = self.load_user_rows(user_id).await?;
        Ok(evaluate_timeline(&memberships, &deposits, start, offsets_days))
    }
}
