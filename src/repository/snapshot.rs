use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use super::{Deposit, Membership, MembershipRepository};

/// Exported rows of both tables, as written by a store dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub deposits: Vec<Deposit>,
}

/// In-memory repository over a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotRepository {
    snapshot: Snapshot,
}

impl SnapshotRepository {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(json).context("Failed to parse membership snapshot")?;
        Ok(Self::new(snapshot))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let repo = Self::from_json(&raw)?;
        tracing::debug!(
            "Loaded snapshot {}: {} memberships, {} deposits",
            path.display(),
            repo.snapshot.memberships.len(),
            repo.snapshot.deposits.len()
        );
        Ok(repo)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[async_trait]
impl MembershipRepository for SnapshotRepository {
    async fn list_user_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>> {
        Ok(self
            .snapshot
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_user_deposits(&self, user_id: Uuid) -> Result<Vec<Deposit>> {
        Ok(self
            .snapshot
            .deposits
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>> {
        Ok(self.snapshot.memberships.clone())
    }

    async fn list_deposits(&self) -> Result<Vec<Deposit>> {
        Ok(self.snapshot.deposits.clone())
    }
}
