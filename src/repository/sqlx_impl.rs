use super::*;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

const MEMBERSHIP_COLUMNS: &str = r#"SELECT m.id, m.user_id, p.package_type, p.name AS package_name, m.status,
       m.start_date, m.end_date, m.is_active, m.deleted_at
   FROM memberships m
   LEFT JOIN membership_packages p ON p.id = m.package_id"#;

// Deposits are keyed by package. The owning membership is the user's only
// membership of that package, or else the one whose dates cover the expiry day.
// Ambiguous or missing links stay NULL.
const DEPOSIT_COLUMNS: &str = r#"SELECT d.id, link.membership_id, d.package_id, d.user_id, d.deposit_remaining,
       d.expires_at, d.is_active
   FROM pilates_deposits d
   LEFT JOIN LATERAL (
       SELECT CASE
           WHEN COUNT(*) = 1 THEN (array_agg(m.id))[1]
           WHEN COUNT(*) FILTER (
               WHERE d.expires_at::date BETWEEN m.start_date AND m.end_date
           ) = 1 THEN (array_agg(m.id) FILTER (
               WHERE d.expires_at::date BETWEEN m.start_date AND m.end_date
           ))[1]
       END AS membership_id
       FROM memberships m
       WHERE m.user_id = d.user_id AND m.package_id = d.package_id
   ) link ON true"#;

#[derive(Debug, FromRow)]
struct MembershipRow {
    id: Uuid,
    user_id: Uuid,
    package_type: Option<String>,
    package_name: Option<String>,
    status: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    is_active: Option<bool>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = anyhow::Error;

    fn try_from(row: MembershipRow) -> Result<Self> {
        let status: MembershipStatus = row
            .status
            .as_deref()
            .ok_or_else(|| anyhow!("status is null"))?
            .parse()?;

        let start_date = row.start_date.ok_or_else(|| anyhow!("start_date is null"))?;
        let end_date = row.end_date.ok_or_else(|| anyhow!("end_date is null"))?;
        if end_date < start_date {
            return Err(anyhow!("end_date {} before start_date {}", end_date, start_date));
        }

        Ok(Membership {
            id: row.id,
            user_id: row.user_id,
            package_kind: row.package_type.ok_or_else(|| anyhow!("package_type is null"))?,
            package_name: row.package_name,
            status,
            start_date,
            end_date,
            is_active_flag: row.is_active.unwrap_or(false),
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct DepositRow {
    id: Uuid,
    membership_id: Option<Uuid>,
    package_id: Option<Uuid>,
    user_id: Uuid,
    deposit_remaining: Option<i32>,
    expires_at: Option<DateTime<Utc>>,
    is_active: Option<bool>,
}

impl TryFrom<DepositRow> for Deposit {
    type Error = anyhow::Error;

    fn try_from(row: DepositRow) -> Result<Self> {
        let remaining = row.deposit_remaining.unwrap_or(0);
        let remaining =
            u32::try_from(remaining).map_err(|_| anyhow!("negative balance {}", remaining))?;

        Ok(Deposit {
            id: row.id,
            membership_id: row.membership_id.ok_or_else(|| match row.package_id {
                Some(package_id) => anyhow!("no unique membership for package {}", package_id),
                None => anyhow!("package_id is null"),
            })?,
            user_id: row.user_id,
            remaining,
            expires_at: row.expires_at.ok_or_else(|| anyhow!("expires_at is null"))?,
            is_active_flag: row.is_active.unwrap_or(false),
        })
    }
}

/// Converts raw rows, dropping any that cannot be represented.
/// A dropped row never contributes access.
fn convert_rows<R, T>(rows: Vec<R>, table: &str, id_of: impl Fn(&R) -> Uuid) -> Vec<T>
where
    T: TryFrom<R, Error = anyhow::Error>,
{
    rows.into_iter()
        .filter_map(|row| {
            let id = id_of(&row);
            match T::try_from(row) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} row {}: {}", table, id, e);
                    None
                }
            }
        })
        .collect()
}

pub struct PgMembershipRepository {
    pub pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn list_user_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(&format!(
            "{} WHERE m.user_id = $1 ORDER BY m.end_date DESC",
            MEMBERSHIP_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(convert_rows(rows, "memberships", |r| r.id))
    }

    async fn list_user_deposits(&self, user_id: Uuid) -> Result<Vec<Deposit>> {
        let rows = sqlx::query_as::<_, DepositRow>(&format!(
            "{} WHERE d.user_id = $1 ORDER BY d.expires_at DESC",
            DEPOSIT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(convert_rows(rows, "pilates_deposits", |r| r.id))
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(&format!(
            "{} ORDER BY m.end_date DESC",
            MEMBERSHIP_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(convert_rows(rows, "memberships", |r| r.id))
    }

    async fn list_deposits(&self) -> Result<Vec<Deposit>> {
        let rows = sqlx::query_as::<_, DepositRow>(&format!(
            "{} ORDER BY d.expires_at DESC",
            DEPOSIT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(convert_rows(rows, "pilates_deposits", |r| r.id))
    }
}
