use actix_web::{delete, get, post, web, HttpResponse, Responder};
use log::info;
use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::{
    auth::{hash_password, token::CREDENTIALS_ERROR, AuthenticatedUserId},
    db::users,
    error::AppError,
    models::{NewUser, User, UserCreate, UserResponse},
};

/// Loads the caller and requires the `admin` role.
async fn require_admin(conn: &mut SqliteConnection, user_id: i64) -> Result<User, AppError> {
    let user = users::get_user(conn, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(CREDENTIALS_ERROR.into()))?;

    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin privileges required".into()));
    }
    Ok(user)
}

/// Lists every account. Admin only.
#[get("")]
pub async fn list_users(
    pool: web::Data<SqlitePool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    require_admin(&mut conn, user_id.0).await?;

    let users: Vec<UserResponse> = users::list_users(&mut conn)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// Creates an account with any role. Admin only.
///
/// ## Responses:
/// - `201 Created`: the new `UserResponse`.
/// - `409 Conflict`: the email is already registered.
#[post("")]
pub async fn create_user(
    pool: web::Data<SqlitePool>,
    user_data: web::Json<UserCreate>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let mut conn = pool.acquire().await?;
    require_admin(&mut conn, user_id.0).await?;

    let user_data = user_data.into_inner();
    let new_user = NewUser {
        hashed_password: hash_password(&user_data.password)?,
        email: user_data.email,
        full_name: user_data.full_name,
        role: user_data.role,
        is_active: user_data.is_active,
    };
    let user = users::create_user(&mut conn, &new_user).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Deletes an account together with every task it owns. Admin only.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `404 Not Found`: no such user.
#[delete("/{id}")]
pub async fn delete_user(
    pool: web::Data<SqlitePool>,
    target_id: web::Path<i64>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let target_id = target_id.into_inner();

    let mut conn = pool.acquire().await?;
    let admin = require_admin(&mut conn, user_id.0).await?;

    if !users::delete_user(&mut conn, target_id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!("User {} deleted by admin {}", target_id, admin.id);

    Ok(HttpResponse::NoContent().finish())
}
