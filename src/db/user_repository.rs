use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::db::models::UserRow;

/// Repository for user account database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user and return the stored record.
    /// Fails with a unique violation when the email is already taken.
    pub async fn create(
        pool: &Pool<Postgres>,
        name: &str,
        email: &str,
        password_hash: &str,
        last_name: Option<&str>,
        location: Option<&str>,
    ) -> Result<UserRow, sqlx::Error> {
        debug!("Creating user: email={}", email);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, last_name, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, last_name, email, location, password_hash, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(last_name)
        .bind(location)
        .fetch_one(pool)
        .await?;

        debug!("User created with id={}", row.id);
        Ok(row)
    }

    pub async fn find_by_email(
        pool: &Pool<Postgres>,
        email: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, last_name, email, location, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Replace a user's profile fields. Returns `None` for an unknown id.
    pub async fn update_profile(
        pool: &Pool<Postgres>,
        user_id: i64,
        name: &str,
        email: &str,
        last_name: Option<&str>,
        location: Option<&str>,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        debug!("Updating profile for user={}", user_id);

        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                last_name = $4,
                location = $5,
                updated_at = timezone('utc', now())
            WHERE id = $1
            RETURNING id, name, last_name, email, location, password_hash, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(last_name)
        .bind(location)
        .fetch_optional(pool)
        .await
    }
}
