use chrono::{Duration, Utc};
use fake::{Fake, faker::company::en::Buzzword};
use getfit_access::domain::{Membership, MembershipStatus};
use uuid::Uuid;

use crate::common::reference_today;

pub struct MembershipFactory {
    membership: Membership,
}

#[allow(dead_code)]
impl MembershipFactory {
    /// Random active membership covering the reference day.
    pub fn new() -> Self {
        let today = reference_today();
        let started: i64 = (1..30).fake();
        let remaining: i64 = (1..60).fake();
        let kinds = ["free_gym", "pilates", "ultimate", "personal_training"];
        let kind = kinds[(0..kinds.len()).fake::<usize>()];

        Self {
            membership: Membership {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                package_kind: kind.to_string(),
                package_name: Some(Buzzword().fake()),
                status: MembershipStatus::Active,
                start_date: today - Duration::days(started),
                end_date: today + Duration::days(remaining),
                is_active_flag: true,
                deleted_at: None,
            },
        }
    }

    pub fn build() -> Membership {
        Self::new().finish()
    }

    pub fn build_for(user_id: Uuid, kind: &str) -> Membership {
        Self::new().user_id(user_id).kind(kind).finish()
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.membership.id = id;
        self
    }

    pub fn user_id(mut self, user_id: Uuid) -> Self {
        self.membership.user_id = user_id;
        self
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.membership.package_kind = kind.to_string();
        self
    }

    pub fn status(mut self, status: MembershipStatus) -> Self {
        self.membership.status = status;
        self
    }

    pub fn flag(mut self, is_active: bool) -> Self {
        self.membership.is_active_flag = is_active;
        self
    }

    /// End date relative to the reference day.
    pub fn ends_in(mut self, days: i64) -> Self {
        self.membership.end_date = reference_today() + Duration::days(days);
        if self.membership.start_date > self.membership.end_date {
            self.membership.start_date = self.membership.end_date - Duration::days(30);
        }
        self
    }

    /// Start date relative to the reference day.
    pub fn starts_in(mut self, days: i64) -> Self {
        self.membership.start_date = reference_today() + Duration::days(days);
        if self.membership.end_date < self.membership.start_date {
            self.membership.end_date = self.membership.start_date + Duration::days(30);
        }
        self
    }

    pub fn deleted(mut self) -> Self {
        self.membership.deleted_at = Some(Utc::now());
        self
    }

    pub fn finish(self) -> Membership {
        self.membership
    }
}

impl Default for MembershipFactory {
    fn default() -> Self {
        Self::new()
    }
}
