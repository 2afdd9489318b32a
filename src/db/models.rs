use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::api::job::models::{JobStatus, JobType};

/// Database representation of a job with all fields
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i64,
    pub created_by: i64,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database representation of a user account
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub location: Option<String>,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input row for bulk seeding; a missing `created_at` means "now"
#[derive(Debug, Clone)]
pub struct NewJob {
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub created_at: Option<NaiveDateTime>,
}

/// One row of the per-status aggregation
#[derive(Debug, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// One row of the per-month aggregation; `month` is the truncated month start
#[derive(Debug, FromRow)]
pub struct MonthCount {
    pub month: NaiveDateTime,
    pub count: i64,
}
