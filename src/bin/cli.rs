use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use getfit_access::config::Settings;
use getfit_access::constants::DEFAULT_TIMELINE_OFFSETS;
use getfit_access::logging::init_logging;
use getfit_access::repository::MembershipRepository;
use getfit_access::repository::SnapshotRepository;
use getfit_access::repository::sqlx_impl::PgMembershipRepository;
use getfit_access::services::{AccessService, AuditOptions, IntegrityService, summarize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[clap(name = "GetFit access CLI")]
#[clap(about = "Inspect member access and audit membership integrity")]
struct Cli {
    /// JSON export of memberships and deposits; overrides DATABASE_URL
    #[clap(long, global = true, env = "GETFIT_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Reference instant (RFC 3339); defaults to now
    #[clap(long, global = true)]
    at: Option<DateTime<Utc>>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a user's current access categories and credits
    Access {
        #[clap(long)]
        user_id: Uuid,
    },
    /// Evaluate a user's access at day offsets from the reference instant
    Timeline {
        #[clap(long)]
        user_id: Uuid,
        #[clap(long, value_delimiter = ',', allow_hyphen_values = true)]
        offsets: Vec<i64>,
    },
    /// Scan all rows for stale active flags
    Audit {
        #[clap(long)]
        flag_mismatch: bool,
        #[clap(long)]
        premature_expiry: bool,
        #[clap(long)]
        orphan_deposits: bool,
        /// Enable every optional check
        #[clap(long)]
        all_checks: bool,
    },
}

async fn run<R: MembershipRepository>(
    repo: Arc<R>,
    command: Commands,
    now: DateTime<Utc>,
) -> Result<()> {
    let output = match command {
        Commands::Access { user_id } => {
            let (access, expiry) = AccessService::new(repo)
                .access_summary(user_id, now)
                .await?;

            json!({
                "user_id": user_id,
                "at": now,
                "access": access,
                "qr_categories": access.qr_categories(),
                "expiry": expiry,
            })
        }
        Commands::Timeline { user_id, offsets } => {
            let offsets = if offsets.is_empty() {
                DEFAULT_TIMELINE_OFFSETS.to_vec()
            } else {
                offsets
            };
            let checkpoints = AccessService::new(repo)
                .timeline(user_id, now, &offsets)
                .await?;

            json!({
                "user_id": user_id,
                "start": now,
                "checkpoints": checkpoints,
            })
        }
        Commands::Audit {
            flag_mismatch,
            premature_expiry,
            orphan_deposits,
            all_checks,
        } => {
            let options = if all_checks {
                AuditOptions::all()
            } else {
                AuditOptions {
                    flag_mismatch,
                    premature_expiry,
                    orphan_deposits,
                }
            };
            let anomalies = IntegrityService::new(repo).audit(now, &options).await?;

            json!({
                "at": now,
                "summary": summarize(&anomalies),
                "anomalies": anomalies,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_logging(settings.log_level);

    let cli = Cli::parse();
    let now = cli.at.unwrap_or_else(Utc::now);

    match cli.snapshot.or(settings.snapshot_path) {
        Some(path) => {
            tracing::info!("Reading rows from snapshot {}", path.display());
            let repo = Arc::new(SnapshotRepository::from_file(&path)?);
            run(repo, cli.command, now).await
        }
        None => {
            let database_url = settings
                .database_url
                .ok_or_else(|| anyhow!("Set DATABASE_URL or pass --snapshot"))?;
            let repo = Arc::new(
                PgMembershipRepository::connect(&database_url)
                    .await
                    .context("Failed to connect to database")?,
            );
            tracing::info!("✅ Database connected");
            run(repo, cli.command, now).await
        }
    }
}
