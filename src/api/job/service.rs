use sqlx::{Pool, Postgres};
use tracing::info;

use crate::api::error::ServiceError;
use crate::db::job_repository::JobRepository;
use crate::db::models::{MonthCount, StatusCount};
use super::dto::{
    DefaultStats, JobListQuery, JobListResponse, JobResponse, MonthlyCount, StatsResponse,
};
use super::models::{CreateJobRequest, JobStatus, UpdateJobRequest};

/// Job service containing business logic
///
/// Every operation takes the owner id resolved by the authentication
/// layer; nothing here trusts a user id from the request body.
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a single job owned by the caller
    pub async fn create_job(
        &self,
        owner_id: i64,
        job: &CreateJobRequest,
    ) -> Result<JobResponse, ServiceError> {
        info!(
            "Service: Creating job for user={} position={}",
            owner_id, job.position
        );

        let job_row = JobRepository::create(&self.pool, owner_id, job)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!("Service: Job created successfully with id={}", job_row.id);

        Ok(JobResponse { job: job_row })
    }

    /// Fetch a single job by id
    pub async fn get_job(&self, owner_id: i64, job_id: i64) -> Result<JobResponse, ServiceError> {
        let job_row = JobRepository::find_by_id(&self.pool, owner_id, job_id)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NotFound(job_id))?;

        Ok(JobResponse { job: job_row })
    }

    /// List one page of the caller's jobs plus total and page counts
    ///
    /// # Business Logic
    /// - Applies search/status/jobType filters and the requested ordering
    /// - Fetches the requested page and the unpaginated total
    /// - Page count is ceil(total / limit)
    pub async fn list_jobs(
        &self,
        owner_id: i64,
        query: &JobListQuery,
    ) -> Result<JobListResponse, ServiceError> {
        info!(
            "Service: Listing jobs for user={} page={} limit={}",
            owner_id,
            query.page(),
            query.limit()
        );

        let jobs = JobRepository::list(&self.pool, owner_id, query)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let total_jobs = JobRepository::count(&self.pool, owner_id, query)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(JobListResponse {
            jobs,
            total_jobs,
            num_of_pages: page_count(total_jobs, i64::from(query.limit())),
        })
    }

    /// Apply a partial update to one of the caller's jobs
    pub async fn update_job(
        &self,
        owner_id: i64,
        job_id: i64,
        changes: &UpdateJobRequest,
    ) -> Result<JobResponse, ServiceError> {
        info!("Service: Updating job id={} for user={}", job_id, owner_id);

        let job_row = JobRepository::update(&self.pool, owner_id, job_id, changes)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NotFound(job_id))?;

        Ok(JobResponse { job: job_row })
    }

    /// Delete one of the caller's jobs
    pub async fn delete_job(&self, owner_id: i64, job_id: i64) -> Result<(), ServiceError> {
        info!("Service: Deleting job id={} for user={}", job_id, owner_id);

        let deleted = JobRepository::delete(&self.pool, owner_id, job_id)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if deleted {
            Ok(())
        } else {
            Err(ServiceError::NotFound(job_id))
        }
    }

    /// Aggregate the caller's jobs into status counts and a monthly series
    ///
    /// # Business Logic
    /// - Status counts are projected onto the fixed pending/interview/declined
    ///   shape, with missing statuses reported as 0
    /// - The monthly series covers the six most recent months with any
    ///   applications, reordered oldest-to-newest for the response
    pub async fn stats(&self, owner_id: i64) -> Result<StatsResponse, ServiceError> {
        info!("Service: Computing stats for user={}", owner_id);

        let status_rows = JobRepository::status_counts(&self.pool, owner_id)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let month_rows = JobRepository::monthly_counts(&self.pool, owner_id)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(StatsResponse {
            default_stats: shape_default_stats(&status_rows),
            monthly_applications: shape_monthly(month_rows),
        })
    }
}

/// ceil(total / limit); zero rows means zero pages
fn page_count(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

/// Project grouped status counts onto the fixed three-key shape.
/// Statuses outside the fixed set are dropped.
fn shape_default_stats(rows: &[StatusCount]) -> DefaultStats {
    let mut stats = DefaultStats::default();
    for row in rows {
        match row.status.parse::<JobStatus>() {
            Ok(JobStatus::Pending) => stats.pending = row.count,
            Ok(JobStatus::Interview) => stats.interview = row.count,
            Ok(JobStatus::Declined) => stats.declined = row.count,
            Err(()) => {}
        }
    }
    stats
}

/// Render grouped month counts as "Jan 2024"-style labels and flip the
/// newest-first database order into oldest-first for the response
fn shape_monthly(rows: Vec<MonthCount>) -> Vec<MonthlyCount> {
    let mut series: Vec<MonthlyCount> = rows
        .into_iter()
        .map(|row| MonthlyCount {
            date: row.month.format("%b %Y").to_string(),
            count: row.count,
        })
        .collect();
    series.reverse();
    series
}
