use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::{
    auth::AuthenticatedUserId,
    db::tasks,
    error::AppError,
    models::{Task, TaskCreate, TaskQuery, TaskStatusUpdate, TaskUpdate},
};

/// Loads a task and checks it belongs to `user_id`.
///
/// Tasks owned by someone else are reported as missing so their existence does not leak.
async fn owned_task(
    conn: &mut SqliteConnection,
    task_id: i64,
    user_id: i64,
) -> Result<Task, AppError> {
    match tasks::get_task(conn, task_id).await? {
        Some(task) if task.owner_id == user_id => Ok(task),
        _ => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Retrieves the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `status` (optional): `"To Do"`, `"In Progress"` or `"Done"`.
/// - `search` (optional): case-insensitive match on title or description.
///
/// Tasks are ordered by creation date, newest first.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<SqlitePool>,
    query_params: web::Query<TaskQuery>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let tasks = tasks::list_tasks(&mut conn, Some(user_id.0), &query_params).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `422 Unprocessable Entity`: title missing, empty or longer than 255 characters.
#[post("")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    task_data: web::Json<TaskCreate>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let mut conn = pool.acquire().await?;
    let task = tasks::create_task(&mut conn, user_id.0, &task_data).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let task = owned_task(&mut conn, task_id.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task. Only the supplied fields change.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `404 Not Found`: no such task, or it belongs to another user.
/// - `422 Unprocessable Entity`: a supplied title is empty or too long.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskUpdate>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    let mut conn = pool.acquire().await?;
    owned_task(&mut conn, task_id, user_id.0).await?;

    let task = tasks::update_task(&mut conn, task_id, &task_data)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates only the status of a task.
#[patch("/{id}/status")]
pub async fn update_task_status(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    status_data: web::Json<TaskStatusUpdate>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let mut conn = pool.acquire().await?;
    owned_task(&mut conn, task_id, user_id.0).await?;

    let task = tasks::update_task_status(&mut conn, task_id, status_data.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let mut conn = pool.acquire().await?;
    owned_task(&mut conn, task_id, user_id.0).await?;
    tasks::delete_task(&mut conn, task_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
