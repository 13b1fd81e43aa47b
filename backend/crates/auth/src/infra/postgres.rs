//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, mobile_number::MobileNumber, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                name,
                mobile_number,
                email,
                is_verified,
                is_admin,
                session_version,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.into_uuid())
        .bind(user.name.as_str())
        .bind(user.mobile_number.as_str())
        .bind(user.email.as_ref().map(|e| e.as_str()))
        .bind(user.is_verified)
        .bind(user.is_admin)
        .bind(user.session_version)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::MobileNumberTaken
            } else {
                AuthError::Database(e)
            }
        })?;

        tracing::info!(user_id = %user.user_id, "User created");

        Ok(())
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                name,
                mobile_number,
                email,
                is_verified,
                is_admin,
                session_version,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_mobile(&self, mobile_number: &MobileNumber) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                name,
                mobile_number,
                email,
                is_verified,
                is_admin,
                session_version,
                created_at,
                updated_at
            FROM users
            WHERE mobile_number = $1
            "#,
        )
        .bind(mobile_number.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn exists_by_mobile(&self, mobile_number: &MobileNumber) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE mobile_number = $1)",
        )
        .bind(mobile_number.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn mark_verified(&self, user_id: UserId) -> AuthResult<()> {
        sqlx::query("UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id.into_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        name: &UserName,
        email: Option<&Email>,
    ) -> AuthResult<User> {
        // NULL email leaves the stored value untouched
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2,
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING
                user_id,
                name,
                mobile_number,
                email,
                is_verified,
                is_admin,
                session_version,
                created_at,
                updated_at
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(name.as_str())
        .bind(email.map(|e| e.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).ok_or(AuthError::UserNotFound)
    }

    async fn change_mobile(
        &self,
        user_id: UserId,
        mobile_number: &MobileNumber,
    ) -> AuthResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET mobile_number = $2,
                session_version = session_version + 1,
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING
                user_id,
                name,
                mobile_number,
                email,
                is_verified,
                is_admin,
                session_version,
                created_at,
                updated_at
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(mobile_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::MobileNumberTaken
            } else {
                AuthError::Database(e)
            }
        })?;

        let user = row.map(UserRow::into_user).ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %user.user_id, "Mobile number updated, outstanding tokens retired");

        Ok(user)
    }

    async fn delete_stale_unverified(&self, created_before: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM users WHERE is_verified = FALSE AND created_at < $1")
            .bind(created_before)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    name: String,
    mobile_number: String,
    email: Option<String>,
    is_verified: bool,
    is_admin: bool,
    session_version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            name: UserName::from_db(self.name),
            mobile_number: MobileNumber::from_db(self.mobile_number),
            email: self.email.map(Email::from_db),
            is_verified: self.is_verified,
            is_admin: self.is_admin,
            session_version: self.session_version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
