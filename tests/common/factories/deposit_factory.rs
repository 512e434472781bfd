use chrono::Duration;
use fake::Fake;
use getfit_access::domain::{Deposit, Membership};
use uuid::Uuid;

use crate::common::reference_now;

pub struct DepositFactory {
    deposit: Deposit,
}

#[allow(dead_code)]
impl DepositFactory {
    /// Random usable deposit attached to `owner`.
    pub fn for_membership(owner: &Membership) -> Self {
        Self {
            deposit: Deposit {
                id: Uuid::new_v4(),
                membership_id: owner.id,
                user_id: owner.user_id,
                remaining: (1..12).fake(),
                expires_at: reference_now() + Duration::days((1..60).fake::<i64>()),
                is_active_flag: true,
            },
        }
    }

    pub fn build(owner: &Membership, remaining: u32, expires_in_days: i64) -> Deposit {
        Self::for_membership(owner)
            .remaining(remaining)
            .expires_in(Duration::days(expires_in_days))
            .finish()
    }

    pub fn remaining(mut self, remaining: u32) -> Self {
        self.deposit.remaining = remaining;
        self
    }

    /// Expiry relative to the reference instant.
    pub fn expires_in(mut self, delta: Duration) -> Self {
        self.deposit.expires_at = reference_now() + delta;
        self
    }

    pub fn membership_id(mut self, membership_id: Uuid) -> Self {
        self.deposit.membership_id = membership_id;
        self
    }

    pub fn user_id(mut self, user_id: Uuid) -> Self {
        self.deposit.user_id = user_id;
        self
    }

    pub fn flag(mut self, is_active: bool) -> Self {
        self.deposit.is_active_flag = is_active;
        self
    }

    pub fn finish(self) -> Deposit {
        self.deposit
    }
}
