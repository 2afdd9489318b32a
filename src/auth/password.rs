use bcrypt::{hash, verify, DEFAULT_COST};

use crate::api::error::ServiceError;

/// Hash a password using bcrypt.
///
/// Runs on the blocking thread pool since bcrypt is CPU-intensive.
/// `cost` defaults to bcrypt's DEFAULT_COST; tests pass a lower one.
pub async fn hash_password(password: &str, cost: Option<u32>) -> Result<String, ServiceError> {
    let password = password.to_string();
    let cost = cost.unwrap_or(DEFAULT_COST);

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| ServiceError::Internal(e.to_string()))
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("Task join error: {}", e)))?
}

/// Verify a password against a bcrypt hash, also on the blocking pool.
pub async fn verify_password(password: &str, hashed: &str) -> Result<bool, ServiceError> {
    let password = password.to_string();
    let hashed = hashed.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &hashed).map_err(|e| ServiceError::Internal(e.to_string()))
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("Task join error: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let hashed = hash_password("hunter2hunter2", Some(4))
            .await
            .expect("Failed to hash");
        assert!(hashed.starts_with("$2"));

        assert!(verify_password("hunter2hunter2", &hashed)
            .await
            .expect("Failed to verify"));
        assert!(!verify_password("wrong-password", &hashed)
            .await
            .expect("Failed to verify"));
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let first = hash_password("same-input", Some(4)).await.unwrap();
        let second = hash_password("same-input", Some(4)).await.unwrap();
        assert_ne!(first, second);
    }
}
