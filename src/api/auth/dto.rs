use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::UserRow;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Name must be between 3 and 50 characters"
    ))]
    pub name: String,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,

    #[validate(length(max = 50, message = "Location must be at most 50 characters"))]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Please provide a password"))]
    pub password: String,
}

/// Profile update; the password is never changed here
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Name must be between 3 and 50 characters"
    ))]
    pub name: String,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,

    #[validate(length(max = 50, message = "Location must be at most 50 characters"))]
    pub location: Option<String>,
}

/// Public view of a user, without the password hash
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub location: Option<String>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            name: row.name,
            last_name: row.last_name,
            email: row.email,
            location: row.location,
        }
    }
}

/// Response of register, login and updateUser: the user plus a fresh token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            last_name: None,
            location: None,
        }
    }

    #[test]
    fn register_rejects_a_short_name() {
        let request = register_request("ab", "ab@example.com", "secret-password");
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_rejects_a_malformed_email() {
        let request = register_request("Ada", "not-an-email", "secret-password");
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_rejects_a_short_password() {
        let request = register_request("Ada", "ada@example.com", "12345");
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_accepts_a_complete_request() {
        let request = register_request("Ada", "ada@example.com", "secret-password");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn register_reads_optional_camel_case_fields() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret-password",
            "lastName": "Lovelace",
            "location": "London"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(request.location.as_deref(), Some("London"));
    }

    #[test]
    fn update_accepts_missing_optional_fields() {
        let request: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.last_name, None);
        assert_eq!(request.location, None);
    }

    #[test]
    fn update_reads_camel_case_field_names() {
        let request: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "lastName": "Lovelace",
            "location": "London"
        }))
        .unwrap();
        assert_eq!(request.last_name.as_deref(), Some("Lovelace"));
    }

    #[test]
    fn user_response_hides_the_password_hash() {
        let row = UserRow {
            id: 1,
            name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            email: "ada@example.com".to_string(),
            location: None,
            password_hash: "$2b$12$secret".to_string(),
            created_at: chrono::NaiveDateTime::default(),
            updated_at: chrono::NaiveDateTime::default(),
        };
        let body = serde_json::to_value(UserResponse::from(row)).unwrap();
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("password_hash").is_none());
        assert_eq!(body["lastName"], "Lovelace");
    }
}
