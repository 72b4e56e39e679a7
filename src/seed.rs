//! Sample data for development and manual testing.
//!
//! `seed_data` is not idempotent: the accounts use fixed emails, so a second
//! run hits the uniqueness constraint. Everything is written on one
//! transaction, so a failed run leaves the database as it was.

use log::{error, info};
use sqlx::SqlitePool;

use crate::auth::hash_password;
use crate::db::{tasks, users};
use crate::error::AppError;
use crate::models::{NewUser, TaskCreate, TaskStatus, UserRole};

pub const ADMIN_EMAIL: &str = "admin@taskflow.com";
pub const ADMIN_PASSWORD: &str = "Admin123!";
pub const USER1_EMAIL: &str = "user1@taskflow.com";
pub const USER2_EMAIL: &str = "user2@taskflow.com";
pub const USER_PASSWORD: &str = "User123!";

/// What a successful run created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub admins: usize,
    pub users: usize,
    pub tasks: usize,
}

fn account(email: &str, password: &str, full_name: &str, role: UserRole) -> Result<NewUser, AppError> {
    Ok(NewUser {
        email: email.to_string(),
        hashed_password: hash_password(password)?,
        full_name: Some(full_name.to_string()),
        role,
        is_active: true,
    })
}

fn task(title: &str, description: &str, status: TaskStatus) -> TaskCreate {
    TaskCreate {
        title: title.to_string(),
        description: Some(description.to_string()),
        status,
    }
}

/// Creates one admin, two regular users and five tasks (three for user1, two for user2).
///
/// Any failure rolls back the whole batch and is returned to the caller.
pub async fn seed_data(pool: &SqlitePool) -> Result<SeedSummary, AppError> {
    info!("Seeding database with test data...");

    let accounts = [
        account(ADMIN_EMAIL, ADMIN_PASSWORD, "Admin User", UserRole::Admin)?,
        account(USER1_EMAIL, USER_PASSWORD, "John Doe", UserRole::User)?,
        account(USER2_EMAIL, USER_PASSWORD, "Jane Smith", UserRole::User)?,
    ];

    let user1_tasks = [
        task(
            "Complete project documentation",
            "Write comprehensive documentation for the TaskFlow project",
            TaskStatus::InProgress,
        ),
        task(
            "Review pull requests",
            "Review and merge pending pull requests",
            TaskStatus::Todo,
        ),
        task(
            "Fix authentication bug",
            "Investigate and fix the authentication issue reported in #123",
            TaskStatus::Done,
        ),
    ];
    let user2_tasks = [
        task(
            "Design new UI mockups",
            "Create mockups for the new dashboard design",
            TaskStatus::InProgress,
        ),
        task(
            "Update dependencies",
            "Update all npm and Python dependencies to latest versions",
            TaskStatus::Todo,
        ),
    ];

    let mut tx = pool.begin().await?;

    let result: Result<SeedSummary, AppError> = async {
        let mut created = Vec::with_capacity(accounts.len());
        for new_user in &accounts {
            created.push(users::create_user(&mut tx, new_user).await?);
        }
        let (user1, user2) = (&created[1], &created[2]);

        for input in &user1_tasks {
            tasks::create_task(&mut tx, user1.id, input).await?;
        }
        for input in &user2_tasks {
            tasks::create_task(&mut tx, user2.id, input).await?;
        }

        Ok(SeedSummary {
            admins: 1,
            users: created.len(),
            tasks: user1_tasks.len() + user2_tasks.len(),
        })
    }
    .await;

    match result {
        Ok(summary) => {
            tx.commit().await?;
            info!(
                "Seeded {} users ({} admin) and {} tasks",
                summary.users, summary.admins, summary.tasks
            );
            Ok(summary)
        }
        Err(e) => {
            error!("Error seeding database: {}", e);
            tx.rollback().await?;
            Err(e)
        }
    }
}
