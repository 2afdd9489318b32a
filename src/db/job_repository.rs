use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::api::job::dto::JobListQuery;
use crate::api::job::models::{CreateJobRequest, UpdateJobRequest};
use crate::db::models::{JobRow, MonthCount, NewJob, StatusCount};

const JOB_COLUMNS: &str =
    "id, created_by, company, position, status, job_type, created_at, updated_at";

/// Repository for Job database operations
///
/// Every query is scoped to the owning user; a job belonging to someone
/// else is indistinguishable from a job that does not exist.
pub struct JobRepository;

impl JobRepository {
    /// Create a new job for a user and return the full job record
    pub async fn create(
        pool: &Pool<Postgres>,
        owner_id: i64,
        job: &CreateJobRequest,
    ) -> Result<JobRow, sqlx::Error> {
        debug!(
            "Creating job: user={}, position={}, status={}",
            owner_id,
            job.position,
            job.status.as_str()
        );

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (created_by, company, position, status, job_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_by, company, position, status, job_type, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&job.company)
        .bind(&job.position)
        .bind(job.status.as_str())
        .bind(job.job_type.as_str())
        .fetch_one(pool)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    /// Fetch a single job by id, scoped to its owner
    pub async fn find_by_id(
        pool: &Pool<Postgres>,
        owner_id: i64,
        job_id: i64,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Fetching job id={} for user={}", job_id, owner_id);

        sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, created_by, company, position, status, job_type, created_at, updated_at
            FROM jobs
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(job_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// Fetch one page of a user's jobs with filters and ordering applied
    pub async fn list(
        pool: &Pool<Postgres>,
        owner_id: i64,
        query: &JobListQuery,
    ) -> Result<Vec<JobRow>, sqlx::Error> {
        debug!(
            "Listing jobs for user={} page={} limit={}",
            owner_id,
            query.page(),
            query.limit()
        );

        let mut builder = Self::select_builder(owner_id, query);
        builder.build_query_as::<JobRow>().fetch_all(pool).await
    }

    /// Count a user's jobs under the same filters as [`Self::list`]
    pub async fn count(
        pool: &Pool<Postgres>,
        owner_id: i64,
        query: &JobListQuery,
    ) -> Result<i64, sqlx::Error> {
        let mut builder = Self::count_builder(owner_id, query);
        builder.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Apply a partial update to a job; absent fields keep their value.
    /// Returns `None` when the job does not exist or belongs to someone else.
    pub async fn update(
        pool: &Pool<Postgres>,
        owner_id: i64,
        job_id: i64,
        changes: &UpdateJobRequest,
    ) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Updating job id={} for user={}", job_id, owner_id);

        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs
            SET company = COALESCE($3, company),
                position = COALESCE($4, position),
                status = COALESCE($5, status),
                job_type = COALESCE($6, job_type),
                updated_at = timezone('utc', now())
            WHERE id = $1 AND created_by = $2
            RETURNING id, created_by, company, position, status, job_type, created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(owner_id)
        .bind(changes.company.as_deref())
        .bind(changes.position.as_deref())
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.job_type.map(|t| t.as_str()))
        .fetch_optional(pool)
        .await
    }

    /// Delete a job. Returns whether a row was actually removed.
    pub async fn delete(
        pool: &Pool<Postgres>,
        owner_id: i64,
        job_id: i64,
    ) -> Result<bool, sqlx::Error> {
        debug!("Deleting job id={} for user={}", job_id, owner_id);

        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND created_by = $2")
            .bind(job_id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count a user's jobs grouped by status
    pub async fn status_counts(
        pool: &Pool<Postgres>,
        owner_id: i64,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY status
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Count a user's jobs per calendar month, most recent six months
    /// with any applications, newest first
    pub async fn monthly_counts(
        pool: &Pool<Postgres>,
        owner_id: i64,
    ) -> Result<Vec<MonthCount>, sqlx::Error> {
        sqlx::query_as::<_, MonthCount>(
            r#"
            SELECT date_trunc('month', created_at) AS month, COUNT(*) AS count
            FROM jobs
            WHERE created_by = $1
            GROUP BY 1
            ORDER BY 1 DESC
            LIMIT 6
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Bulk insert jobs for a user in one statement.
    /// Returns the number of rows inserted.
    pub async fn bulk_create(
        pool: &Pool<Postgres>,
        owner_id: i64,
        jobs: &[NewJob],
    ) -> Result<u64, sqlx::Error> {
        if jobs.is_empty() {
            debug!("Bulk create called with empty job list");
            return Ok(0);
        }

        debug!("Starting bulk insert of {} jobs for user={}", jobs.len(), owner_id);

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO jobs (created_by, company, position, status, job_type, created_at, updated_at) ",
        );
        builder.push_values(jobs, |mut values, job| {
            values.push_bind(owner_id);
            values.push_bind(&job.company);
            values.push_bind(&job.position);
            values.push_bind(job.status.as_str());
            values.push_bind(job.job_type.as_str());
            match job.created_at {
                Some(ts) => {
                    values.push_bind(ts);
                    values.push_bind(ts);
                }
                None => {
                    values.push("timezone('utc', now())");
                    values.push("timezone('utc', now())");
                }
            }
        });

        let result = builder.build().execute(pool).await?;
        let rows_affected = result.rows_affected();
        debug!("Bulk insert completed: {} rows inserted", rows_affected);

        Ok(rows_affected)
    }

    /// Remove every job a user owns. Returns the number of rows removed.
    pub async fn delete_by_owner(
        pool: &Pool<Postgres>,
        owner_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE created_by = $1")
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    fn select_builder(owner_id: i64, query: &JobListQuery) -> QueryBuilder<'static, Postgres> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE created_by = "));
        builder.push_bind(owner_id);
        Self::push_filters(&mut builder, query);
        builder.push(" ORDER BY ");
        builder.push(query.sort.order_clause());
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());
        builder
    }

    fn count_builder(owner_id: i64, query: &JobListQuery) -> QueryBuilder<'static, Postgres> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM jobs WHERE created_by = ");
        builder.push_bind(owner_id);
        Self::push_filters(&mut builder, query);
        builder
    }

    fn push_filters(builder: &mut QueryBuilder<'static, Postgres>, query: &JobListQuery) {
        if let Some(status) = query.status.as_status() {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        if let Some(job_type) = query.job_type.as_job_type() {
            builder.push(" AND job_type = ");
            builder.push_bind(job_type.as_str());
        }
        if let Some(term) = query.search_term() {
            builder.push(" AND position ILIKE ");
            builder.push_bind(like_pattern(term));
        }
    }
}

/// Wrap a search term in `%` wildcards, escaping any wildcard
/// characters the term itself contains
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
