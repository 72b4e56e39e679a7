#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::header,
    middleware::Logger,
    test, web, App,
};
use sqlx::SqlitePool;
use taskflow::{
    auth::{create_access_token, hash_password},
    config::Settings,
    db,
    models::{NewUser, User, UserRole},
    routes,
};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123!";

pub fn test_settings() -> Settings {
    Settings::new(TEST_SECRET)
}

/// A migrated in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = db::create_memory_pool()
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// The full application as `main.rs` assembles it.
pub async fn init_app(
    pool: SqlitePool,
    settings: Settings,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let api_prefix = settings.api_v1_str.clone();
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(settings))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/", web::get().to(routes::health::root))
            .service(web::scope(&api_prefix).configure(routes::config)),
    )
    .await
}

/// Inserts a user directly, bypassing the HTTP layer.
pub async fn insert_user(pool: &SqlitePool, email: &str, role: UserRole, is_active: bool) -> User {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    db::users::create_user(
        &mut conn,
        &NewUser {
            email: email.to_string(),
            hashed_password: hash_password(PASSWORD).expect("Failed to hash password"),
            full_name: None,
            role,
            is_active,
        },
    )
    .await
    .expect("Failed to insert user")
}

pub fn bearer_for(settings: &Settings, user_id: i64) -> (header::HeaderName, String) {
    let token = create_access_token(settings, user_id).expect("Failed to create token");
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
