use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

fn bad_request(error: &str, fields: serde_json::Map<String, serde_json::Value>) -> actix_web::Error {
    let error_response = ErrorResponse {
        error: error.to_string(),
        fields: serde_json::Value::Object(fields),
    };
    actix_web::error::InternalError::from_response(
        "",
        HttpResponse::BadRequest().json(error_response),
    )
    .into()
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        let mut fields = serde_json::Map::new();

        match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                for (field, errors) in validation_errors.field_errors() {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Validation error in field: {}", field))
                        })
                        .collect();
                    fields.insert(field.to_string(), serde_json::json!({"errors": messages}));
                }

                bad_request("Validation failed", fields)
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                let err_string = de_err.to_string();

                let message = if err_string.contains("EOF while parsing") {
                    "Request body is empty. Expected JSON payload"
                } else if err_string.contains("unknown variant") {
                    "Invalid enum value. Check allowed values for this field"
                } else {
                    "Invalid JSON format"
                };
                fields.insert("message".to_string(), serde_json::json!(message));

                bad_request("Request validation failed", fields)
            }
            _ => {
                fields.insert("message".to_string(), serde_json::json!("Validation error"));

                bad_request("Validation failed", fields)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, web, App};
    use actix_web_validator::Json;

    use crate::api::job::models::{CreateJobRequest, UpdateJobRequest};

    async fn echo_create(_body: Json<CreateJobRequest>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn echo_update(_body: Json<UpdateJobRequest>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(json_config())
                    .route("/create", web::post().to(echo_create))
                    .route("/update", web::patch().to(echo_update)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn explicit_empty_company_is_rejected_with_a_field_error() {
        let app = test_app!();

        let req = test::TestRequest::patch()
            .uri("/update")
            .set_json(serde_json::json!({"company": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
        let message = body["fields"]["company"]["errors"][0].as_str().unwrap();
        assert!(message.contains("between 1 and 50"));
    }

    #[actix_web::test]
    async fn unknown_status_value_is_a_bad_request() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/create")
            .set_json(serde_json::json!({
                "company": "Acme",
                "position": "Engineer",
                "status": "hired"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Request validation failed");
        let message = body["fields"]["message"].as_str().unwrap();
        assert!(message.contains("Invalid enum value"));
    }

    #[actix_web::test]
    async fn empty_body_is_a_bad_request() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/create")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body["fields"]["message"],
            "Request body is empty. Expected JSON payload"
        );
    }

    #[actix_web::test]
    async fn valid_bodies_pass_through() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/create")
            .set_json(serde_json::json!({
                "company": "Acme",
                "position": "Engineer"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
