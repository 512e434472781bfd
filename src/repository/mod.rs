pub mod snapshot;
pub mod sqlx_impl;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub use crate::domain::{Deposit, Membership, MembershipStatus};
pub use snapshot::{Snapshot, SnapshotRepository};

/// Read-only access to the hosted membership and deposit tables.
///
/// Implementations return complete row sets; callers never paginate.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn list_user_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>>;
    async fn list_user_deposits(&self, user_id: Uuid) -> Result<Vec<Deposit>>;
    async fn list_memberships(&self) -> Result<Vec<Membership>>;
    async fn list_deposits(&self) -> Result<Vec<Deposit>>;
}
