use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::job::models::{JobStatus, JobType};
use crate::db::models::JobRow;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Query parameters of `GET /jobs`.
///
/// Every field is optional and parsed leniently: an absent, empty, or
/// unrecognized value falls back to the documented default instead of
/// failing the request. `page` and `limit` additionally treat `0` and
/// non-numeric input as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobListQuery {
    pub search: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub status: StatusFilter,
    #[serde(deserialize_with = "lenient")]
    pub job_type: TypeFilter,
    #[serde(deserialize_with = "lenient")]
    pub sort: SortOrder,
    #[serde(deserialize_with = "lenient_positive")]
    pub page: Option<u32>,
    #[serde(deserialize_with = "lenient_positive")]
    pub limit: Option<u32>,
}

impl JobListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Row offset of the requested page. Saturates at the numeric limit,
    /// so a page beyond the table reads as empty.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page()) - 1).saturating_mul(i64::from(self.limit()))
    }

    /// Search term with the empty string treated as "no filter".
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

/// Status filter with the `all` sentinel made explicit. Unrecognized values
/// behave like the sentinel, i.e. no filter at all.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Is(JobStatus),
}

impl StatusFilter {
    pub fn as_status(&self) -> Option<JobStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Is(status) => Some(*status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse::<JobStatus>().map(StatusFilter::Is)
        }
    }
}

/// Job type filter, same sentinel semantics as [`StatusFilter`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Is(JobType),
}

impl TypeFilter {
    pub fn as_job_type(&self) -> Option<JobType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Is(job_type) => Some(*job_type),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(TypeFilter::All)
        } else {
            s.parse::<JobType>().map(TypeFilter::Is)
        }
    }
}

/// Result ordering. `latest` is the default, also for unrecognized input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
    PositionAsc,
    PositionDesc,
}

impl SortOrder {
    /// ORDER BY clause for this ordering. The id tiebreaker makes every
    /// ordering total, so `a-z` and `z-a` are exact reverses of each other.
    pub fn order_clause(&self) -> &'static str {
        match self {
            SortOrder::Latest => "created_at DESC, id DESC",
            SortOrder::Oldest => "created_at ASC, id ASC",
            SortOrder::PositionAsc => "position ASC, id ASC",
            SortOrder::PositionDesc => "position DESC, id DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortOrder::Latest),
            "oldest" => Ok(SortOrder::Oldest),
            "a-z" => Ok(SortOrder::PositionAsc),
            "z-a" => Ok(SortOrder::PositionDesc),
            _ => Err(()),
        }
    }
}

/// Parse a query value through `FromStr`, falling back to the type's default
/// when the value is missing or unrecognized.
fn lenient<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr + Default,
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

/// Parse a positive integer query value, mapping non-numeric input and `0`
/// to "absent" so the caller's default applies.
fn lenient_positive<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse::<u32>().ok()).filter(|n| *n > 0))
}

/// Response of `GET /jobs`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
    pub total_jobs: i64,
    pub num_of_pages: i64,
}

/// Response of the single-job endpoints.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobRow,
}

/// Response of `GET /jobs/stats`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub default_stats: DefaultStats,
    pub monthly_applications: Vec<MonthlyCount>,
}

/// Status counts projected onto a fixed shape; statuses with no jobs stay 0.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct DefaultStats {
    pub pending: i64,
    pub interview: i64,
    pub declined: i64,
}

/// One month of the recent-applications series, e.g. `{"Jan 2024", 3}`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MonthlyCount {
    pub date: String,
    pub count: i64,
}
