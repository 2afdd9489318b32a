use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl HealthResponse {
    fn up(status: &str) -> Self {
        Self {
            status: status.to_string(),
            database: "connected".to_string(),
            error: None,
        }
    }

    fn down(status: &str, error: String) -> Self {
        Self {
            status: status.to_string(),
            database: "disconnected".to_string(),
            error: Some(error),
        }
    }
}

/// One round trip to the database; health and readiness share this probe
async fn database_reachable(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map(|_| ())
}

/// Health check endpoint
///
/// General health check including database connectivity.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    match database_reachable(pool.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::up("healthy")),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable()
                .json(HealthResponse::down("unhealthy", format!("Database error: {}", e)))
        }
    }
}

/// Readiness check endpoint
///
/// Use for Kubernetes readiness probes; a 503 here removes the instance
/// from the load balancer until the database comes back.
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    match database_reachable(pool.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::up("ready")),
        Err(e) => {
            error!("Readiness check failed: database unavailable: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse::down(
                "not_ready",
                format!("Database unavailable: {}", e),
            ))
        }
    }
}

/// Liveness check endpoint
///
/// Process-alive check with no dependency probes, for liveness probes
/// that restart the pod on failure.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        database: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn liveness_does_not_touch_the_database() {
        let app = test::init_service(App::new().service(liveness_check)).await;

        let req = test::TestRequest::get().uri("/live").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "alive");
        assert_eq!(body["database"], "not_checked");
    }
}
