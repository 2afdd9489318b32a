use sqlx::{Pool, Postgres};
use tracing::info;

use crate::api::error::ServiceError;
use crate::auth::password;
use crate::auth::token::TokenManager;
use crate::db::user_repository::UserRepository;
use super::dto::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest};

/// Account service: registration, login and profile updates
///
/// Every successful operation returns a freshly issued token so the
/// client can keep using updated claims.
pub struct AuthService {
    pool: Pool<Postgres>,
    tokens: TokenManager,
    demo_email: Option<String>,
}

impl AuthService {
    pub fn new(pool: Pool<Postgres>, tokens: TokenManager, demo_email: Option<String>) -> Self {
        Self {
            pool,
            tokens,
            demo_email,
        }
    }

    /// Create an account and sign the first token
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ServiceError> {
        info!("Service: Registering user email={}", request.email);

        let password_hash = password::hash_password(&request.password, None).await?;

        let user = UserRepository::create(
            &self.pool,
            &request.name,
            &request.email,
            &password_hash,
            request.last_name.as_deref(),
            request.location.as_deref(),
        )
        .await
        .map_err(map_unique_violation)?;

        info!("Service: User registered with id={}", user.id);

        let token = self.issue_token(user.id, &user.email)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Verify credentials and sign a session token.
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ServiceError> {
        info!("Service: Login attempt email={}", request.email);

        let user = UserRepository::find_by_email(&self.pool, &request.email)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = password::verify_password(&request.password, &user.password_hash).await?;
        if !valid {
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        info!("Service: Login succeeded for user={}", user.id);

        let token = self.issue_token(user.id, &user.email)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Replace the caller's profile fields and reissue the token
    pub async fn update_user(
        &self,
        user_id: i64,
        request: &UpdateUserRequest,
    ) -> Result<AuthResponse, ServiceError> {
        info!("Service: Updating profile for user={}", user_id);

        let user = UserRepository::update_profile(
            &self.pool,
            user_id,
            &request.name,
            &request.email,
            request.last_name.as_deref(),
            request.location.as_deref(),
        )
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| ServiceError::Unauthorized("Unknown user".to_string()))?;

        let token = self.issue_token(user.id, &user.email)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    fn issue_token(&self, user_id: i64, email: &str) -> Result<String, ServiceError> {
        let read_only = is_demo_email(self.demo_email.as_deref(), email);
        self.tokens
            .issue(user_id, read_only)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

/// The demo account is picked out by configured email, case-insensitively
fn is_demo_email(demo: Option<&str>, email: &str) -> bool {
    demo.is_some_and(|demo| demo.eq_ignore_ascii_case(email))
}

fn map_unique_violation(err: sqlx::Error) -> ServiceError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ServiceError::ValidationError("Email already in use, please choose another".to_string())
        }
        _ => ServiceError::DatabaseError(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_detection_ignores_case() {
        assert!(is_demo_email(Some("demo@example.com"), "demo@example.com"));
        assert!(is_demo_email(Some("demo@example.com"), "Demo@Example.COM"));
        assert!(!is_demo_email(Some("demo@example.com"), "other@example.com"));
    }

    #[test]
    fn no_configured_demo_means_no_demo() {
        assert!(!is_demo_email(None, "demo@example.com"));
    }
}
