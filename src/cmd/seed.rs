use chrono::{DateTime, Utc};
use clap::Args;
use serde::Deserialize;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::api::job::models::{JobStatus, JobType};
use crate::db::job_repository::JobRepository;
use crate::db::models::NewJob;
use crate::db::user_repository::UserRepository;

/// Arguments of the `seed` subcommand
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Email of the user receiving the jobs; the account must already exist
    #[arg(long)]
    pub email: String,

    /// JSON file holding the jobs to load
    #[arg(long, default_value = "data/mock-jobs.json")]
    pub file: String,

    /// Delete the user's existing jobs first
    #[arg(long)]
    pub fresh: bool,
}

/// One record of the seed file. `createdAt` is kept so seeded data
/// produces a believable monthly series.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedJob {
    company: String,
    position: String,
    #[serde(default)]
    status: JobStatus,
    #[serde(default)]
    job_type: JobType,
    created_at: Option<DateTime<Utc>>,
}

/// Load the seed file into the given user's account
pub async fn run(pool: &Pool<Postgres>, args: &SeedArgs) -> Result<(), String> {
    let raw = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("Failed to read seed file {}: {}", args.file, e))?;

    let records: Vec<SeedJob> = serde_json::from_str(&raw)
        .map_err(|e| format!("Seed file {} is not valid JSON: {}", args.file, e))?;

    let user = UserRepository::find_by_email(pool, &args.email)
        .await
        .map_err(|e| format!("Failed to look up user {}: {}", args.email, e))?
        .ok_or_else(|| {
            format!(
                "No user with email {}; register the account first",
                args.email
            )
        })?;

    if args.fresh {
        let removed = JobRepository::delete_by_owner(pool, user.id)
            .await
            .map_err(|e| format!("Failed to clear existing jobs: {}", e))?;
        info!("Removed {} existing jobs for {}", removed, args.email);
    }

    let jobs: Vec<NewJob> = records
        .into_iter()
        .map(|record| NewJob {
            company: record.company,
            position: record.position,
            status: record.status,
            job_type: record.job_type,
            created_at: record.created_at.map(|ts| ts.naive_utc()),
        })
        .collect();

    let inserted = JobRepository::bulk_create(pool, user.id, &jobs)
        .await
        .map_err(|e| format!("Failed to insert seed jobs: {}", e))?;

    info!("Seeded {} jobs for {}", inserted, args.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seed_records_parse_the_mock_format() {
        let record: SeedJob = serde_json::from_value(json!({
            "company": "Peak Performers",
            "position": "Data Engineer",
            "status": "interview",
            "jobType": "part-time",
            "createdAt": "2024-01-15T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(record.status, JobStatus::Interview);
        assert_eq!(record.job_type, JobType::PartTime);
        let created = record.created_at.unwrap().naive_utc();
        assert_eq!(created.format("%b %Y").to_string(), "Jan 2024");
    }

    #[test]
    fn status_type_and_timestamp_are_optional() {
        let record: SeedJob = serde_json::from_value(json!({
            "company": "Acme",
            "position": "Engineer"
        }))
        .unwrap();

        assert_eq!(record.status, JobStatus::Pending);
        assert_eq!(record.job_type, JobType::FullTime);
        assert!(record.created_at.is_none());
    }

    #[test]
    fn bundled_mock_file_parses() {
        let records: Vec<SeedJob> =
            serde_json::from_str(include_str!("../../data/mock-jobs.json")).unwrap();
        assert!(records.len() >= 8);
        assert!(records.iter().all(|r| !r.company.is_empty()));
    }
}
