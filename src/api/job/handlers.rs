use actix_web::{
    delete, get, patch, post,
    web::{scope, Data, Path, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::auth::middleware::Authentication;
use crate::auth::AuthUser;
use super::dto::JobListQuery;
use super::models::{CreateJobRequest, UpdateJobRequest};
use super::service::JobService;

#[get("")]
async fn list_jobs(
    user: AuthUser,
    service: Data<JobService>,
    query: Query<JobListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.list_jobs(user.user_id, &query).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/stats")]
async fn job_stats(
    user: AuthUser,
    service: Data<JobService>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.stats(user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{id}")]
async fn get_job(
    user: AuthUser,
    service: Data<JobService>,
    path: Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.get_job(user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("")]
async fn create_job(
    user: AuthUser,
    service: Data<JobService>,
    body: Json<CreateJobRequest>,
) -> Result<HttpResponse, ServiceError> {
    user.require_writable()?;

    let response = service.create_job(user.user_id, &body).await?;
    Ok(HttpResponse::Created().json(response))
}

#[patch("/{id}")]
async fn update_job(
    user: AuthUser,
    service: Data<JobService>,
    path: Path<i64>,
    body: Json<UpdateJobRequest>,
) -> Result<HttpResponse, ServiceError> {
    user.require_writable()?;

    let response = service
        .update_job(user.user_id, path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{id}")]
async fn delete_job(
    user: AuthUser,
    service: Data<JobService>,
    path: Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    user.require_writable()?;

    service.delete_job(user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Mount the job routes behind the authentication middleware.
/// `/stats` must register ahead of the `/{id}` matcher.
pub fn job_config(config: &mut ServiceConfig, auth: Authentication) {
    config.service(
        scope("jobs")
            .wrap(auth)
            .service(list_jobs)
            .service(job_stats)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}
