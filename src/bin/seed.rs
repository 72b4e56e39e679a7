//! Seeds the database with sample users and tasks.
//!
//! Usage: `seed [--test]`. With `--test` the `TEST_DATABASE_URL` database is
//! used instead of `DATABASE_URL`.

use taskflow::{config::Settings, db, seed, AppError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.log_filter()))
        .init();

    let use_test_db = std::env::args().skip(1).any(|arg| arg == "--test");
    let database_url = if use_test_db {
        &settings.test_database_url
    } else {
        &settings.database_url
    };

    let pool = db::create_pool(database_url).await.map_err(AppError::from)?;
    db::run_migrations(&pool).await.map_err(AppError::from)?;

    println!("Seeding database with test data...");
    let summary = match seed::seed_data(&pool).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error seeding database: {}", e);
            std::process::exit(1);
        }
    };

    println!("Successfully seeded database with:");
    println!(
        "  - {} users ({} admin, {} regular users)",
        summary.users,
        summary.admins,
        summary.users - summary.admins
    );
    println!("  - {} tasks", summary.tasks);
    println!("\nTest credentials:");
    println!("  Admin: {} / {}", seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD);
    println!("  User1: {} / {}", seed::USER1_EMAIL, seed::USER_PASSWORD);
    println!("  User2: {} / {}", seed::USER2_EMAIL, seed::USER_PASSWORD);

    Ok(())
}
