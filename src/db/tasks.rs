use chrono::Utc;
use log::debug;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskQuery, TaskStatus, TaskUpdate};

const TASK_COLUMNS: &str = "id, title, description, status, owner_id, created_at, updated_at";

pub async fn create_task(
    conn: &mut SqliteConnection,
    owner_id: i64,
    input: &TaskCreate,
) -> Result<Task, AppError> {
    let now = Utc::now();
    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, status, owner_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.status)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    debug!("Created task {} for user {}", task.id, owner_id);
    Ok(task)
}

pub async fn get_task(conn: &mut SqliteConnection, id: i64) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(task)
}

/// Lists tasks, newest first.
///
/// `owner_id` scopes the list to one user; `None` lists every task.
/// `search` matches title or description case-insensitively.
pub async fn list_tasks(
    conn: &mut SqliteConnection,
    owner_id: Option<i64>,
    query: &TaskQuery,
) -> Result<Vec<Task>, AppError> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1 = 1"));

    if let Some(owner_id) = owner_id {
        builder.push(" AND owner_id = ").push_bind(owner_id);
    }
    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim().to_lowercase());
        builder
            .push(" AND (lower(title) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR lower(coalesce(description, '')) LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    builder.push(" ORDER BY created_at DESC, id DESC");

    let tasks = builder
        .build_query_as::<Task>()
        .fetch_all(&mut *conn)
        .await?;
    Ok(tasks)
}

/// Applies the supplied fields only and refreshes `updated_at`.
/// Returns `None` when no task has this id.
pub async fn update_task(
    conn: &mut SqliteConnection,
    id: i64,
    changes: &TaskUpdate,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET
             title = COALESCE(?, title),
             description = COALESCE(?, description),
             status = COALESCE(?, status),
             updated_at = ?
         WHERE id = ?
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.status)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(task)
}

/// Touches only `status` and `updated_at`.
pub async fn update_task_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: TaskStatus,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET status = ?, updated_at = ? WHERE id = ? RETURNING {TASK_COLUMNS}"
    ))
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(task)
}

/// Returns `false` when no task has this id.
pub async fn delete_task(conn: &mut SqliteConnection, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Counts tasks, optionally only those owned by `owner_id`.
pub async fn count_tasks(conn: &mut SqliteConnection, owner_id: Option<i64>) -> Result<i64, AppError> {
    let (count,): (i64,) = match owner_id {
        Some(owner_id) => {
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_one(&mut *conn)
                .await?
        }
        None => {
            sqlx::query_as("SELECT COUNT(*) FROM tasks")
                .fetch_one(&mut *conn)
                .await?
        }
    };
    Ok(count)
}
