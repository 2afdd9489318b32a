use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Application status of a tracked job
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Interview => "interview",
            JobStatus::Declined => "declined",
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "interview" => Ok(JobStatus::Interview),
            "declined" => Ok(JobStatus::Declined),
            _ => Err(()),
        }
    }
}

/// Employment type of a tracked job
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Remote,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Remote => "remote",
            JobType::Internship => "internship",
        }
    }
}

impl FromStr for JobType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "remote" => Ok(JobType::Remote),
            "internship" => Ok(JobType::Internship),
            _ => Err(()),
        }
    }
}

/// Body of `POST /jobs`. The owner is never part of the payload; it is taken
/// from the authenticated identity.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Company must be between 1 and 50 characters"
    ))]
    pub company: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Position must be between 1 and 100 characters"
    ))]
    pub position: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub job_type: JobType,
}

/// Body of `PATCH /jobs/{id}`. Every field is optional; fields that are
/// present must still pass the same constraints as on create, so an explicit
/// empty company or position is rejected before any query runs.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Company must be between 1 and 50 characters"
    ))]
    pub company: Option<String>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Position must be between 1 and 100 characters"
    ))]
    pub position: Option<String>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [JobStatus::Pending, JobStatus::Interview, JobStatus::Declined] {
            assert_eq!(status.as_str().parse::<JobStatus>(), Ok(status));
        }
        assert!("hired".parse::<JobStatus>().is_err());
    }

    #[test]
    fn job_type_round_trips_through_str() {
        for job_type in [
            JobType::FullTime,
            JobType::PartTime,
            JobType::Remote,
            JobType::Internship,
        ] {
            assert_eq!(job_type.as_str().parse::<JobType>(), Ok(job_type));
        }
        assert!("contract".parse::<JobType>().is_err());
    }

    #[test]
    fn create_rejects_empty_company() {
        let req = CreateJobRequest {
            company: String::new(),
            position: "Backend Engineer".to_string(),
            status: JobStatus::Pending,
            job_type: JobType::FullTime,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_rejects_explicit_empty_strings() {
        let req = UpdateJobRequest {
            company: Some(String::new()),
            ..UpdateJobRequest::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateJobRequest {
            position: Some(String::new()),
            ..UpdateJobRequest::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_accepts_partial_bodies() {
        let req = UpdateJobRequest {
            status: Some(JobStatus::Interview),
            ..UpdateJobRequest::default()
        };
        assert!(req.validate().is_ok());
        assert!(UpdateJobRequest::default().validate().is_ok());
    }

    #[test]
    fn create_defaults_status_and_type() {
        let req: CreateJobRequest =
            serde_json::from_value(serde_json::json!({"company": "Acme", "position": "Dev"}))
                .expect("valid body");
        assert_eq!(req.status, JobStatus::Pending);
        assert_eq!(req.job_type, JobType::FullTime);
    }
}
