use actix_web::{
    patch, post,
    web::{scope, Data, ServiceConfig},
    HttpRequest, HttpResponse,
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::auth::middleware::Authentication;
use crate::auth::rate_limit::{client_key, RateLimiter};
use crate::auth::AuthUser;
use super::dto::{LoginRequest, RegisterRequest, UpdateUserRequest};
use super::service::AuthService;

#[post("/register")]
async fn register(
    req: HttpRequest,
    service: Data<AuthService>,
    limiter: Data<RateLimiter>,
    body: Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    if !limiter.try_acquire(&client_key(&req)) {
        return Err(ServiceError::RateLimited);
    }

    let response = service.register(&body).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    service: Data<AuthService>,
    limiter: Data<RateLimiter>,
    body: Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    if !limiter.try_acquire(&client_key(&req)) {
        return Err(ServiceError::RateLimited);
    }

    let response = service.login(&body).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/updateUser")]
async fn update_user(
    user: AuthUser,
    service: Data<AuthService>,
    body: Json<UpdateUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    user.require_writable()?;

    let response = service.update_user(user.user_id, &body).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Mount the account routes. Register and login stay public (behind the
/// shared rate limiter); updateUser sits in a nested scope wrapped with
/// the authentication middleware.
pub fn auth_config(config: &mut ServiceConfig, auth: Authentication) {
    config.service(
        scope("auth")
            .service(register)
            .service(login)
            .service(scope("").wrap(auth).service(update_user)),
    );
}
