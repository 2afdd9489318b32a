use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};
use tracing::{debug, warn};

use crate::api::error::ServiceError;
use crate::auth::identity::AuthUser;
use crate::auth::token::{TokenError, TokenManager};

/// Authentication middleware factory
///
/// Verifies the bearer token on every request passing through the
/// wrapped scope and attaches the resolved [`AuthUser`] to request
/// extensions. Requests without a valid token are answered with 401
/// before they reach a handler.
#[derive(Clone)]
pub struct Authentication {
    tokens: TokenManager,
}

impl Authentication {
    pub fn new(tokens: TokenManager) -> Self {
        Self { tokens }
    }
}

impl<S> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

/// Authentication middleware service instance
pub struct AuthenticationService<S> {
    service: Rc<S>,
    tokens: TokenManager,
}

impl<S> Service<ServiceRequest> for AuthenticationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let tokens = self.tokens.clone();

        Box::pin(async move {
            // Header borrows end with this block so the request can be
            // mutated afterwards
            let verified = {
                let header = req
                    .headers()
                    .get("Authorization")
                    .and_then(|value| value.to_str().ok());

                match header {
                    Some(header) => TokenManager::extract_bearer(header)
                        .and_then(|token| tokens.verify(token)),
                    None => Err(TokenError::Missing),
                }
            };

            match verified {
                Ok(claims) => {
                    debug!("Authenticated user={}", claims.user_id);
                    req.extensions_mut().insert(AuthUser {
                        user_id: claims.user_id,
                        read_only: claims.read_only,
                    });
                    service.call(req).await
                }
                Err(err) => {
                    warn!("Authentication rejected: {}", err);
                    let response = ServiceError::Unauthorized(err.to_string()).error_response();
                    let (req, _) = req.into_parts();
                    Ok(ServiceResponse::new(req, response))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    async fn whoami(user: AuthUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "userId": user.user_id,
            "readOnly": user.read_only,
        }))
    }

    fn manager() -> TokenManager {
        TokenManager::new("middleware-test-secret", 1)
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler() {
        let tokens = manager();
        let token = tokens.issue(42, false).unwrap();

        let app = test::init_service(
            App::new()
                .wrap(Authentication::new(tokens))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["userId"], 42);
        assert_eq!(body["readOnly"], false);
    }

    #[actix_web::test]
    async fn demo_claim_travels_into_the_identity() {
        let tokens = manager();
        let token = tokens.issue(9, true).unwrap();

        let app = test::init_service(
            App::new()
                .wrap(Authentication::new(tokens))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["readOnly"], true);
    }

    #[actix_web::test]
    async fn missing_header_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(Authentication::new(manager()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(Authentication::new(manager()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer not-a-real-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn non_bearer_scheme_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(Authentication::new(manager()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
