use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{NewUser, User, UserChanges};

const USER_COLUMNS: &str =
    "id, email, hashed_password, full_name, role, is_active, created_at, updated_at";

/// Inserts a new user. A duplicate email fails with `AppError::Conflict`.
pub async fn create_user(conn: &mut SqliteConnection, new_user: &NewUser) -> Result<User, AppError> {
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, hashed_password, full_name, role, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&new_user.email)
    .bind(&new_user.hashed_password)
    .bind(&new_user.full_name)
    .bind(new_user.role)
    .bind(new_user.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    debug!("Created user {} ({})", user.id, user.email);
    Ok(user)
}

pub async fn get_user(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, AppError> {
    let user =
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(user)
}

pub async fn list_users(conn: &mut SqliteConnection) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(&mut *conn)
        .await?;
    Ok(users)
}

/// Applies the supplied fields only and refreshes `updated_at`.
/// Returns `None` when no user has this id.
pub async fn update_user(
    conn: &mut SqliteConnection,
    id: i64,
    changes: &UserChanges,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET
             email = COALESCE(?, email),
             hashed_password = COALESCE(?, hashed_password),
             full_name = COALESCE(?, full_name),
             role = COALESCE(?, role),
             is_active = COALESCE(?, is_active),
             updated_at = ?
         WHERE id = ?
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&changes.email)
    .bind(&changes.hashed_password)
    .bind(&changes.full_name)
    .bind(changes.role)
    .bind(changes.is_active)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(user)
}

/// Deletes a user. The `tasks.owner_id` foreign key removes every task they own
/// in the same statement. Returns `false` when no user has this id.
pub async fn delete_user(conn: &mut SqliteConnection, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    debug!("Deleted user {} ({} rows)", id, result.rows_affected());
    Ok(result.rows_affected() > 0)
}

pub async fn count_users(conn: &mut SqliteConnection) -> Result<i64, AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
