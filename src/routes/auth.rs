use actix_web::{post, web, HttpResponse, Responder};
use log::info;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    auth::{
        create_access_token, create_refresh_token, hash_password, token::CREDENTIALS_ERROR,
        verify_password, verify_refresh_token, AccessTokenResponse, AuthenticatedUserId,
        LoginRequest, RegisterRequest, TokenRefreshRequest, TokenResponse,
    },
    config::Settings,
    db::users,
    error::AppError,
    models::{NewUser, UserResponse, UserRole},
};

fn issue_tokens(settings: &Settings, user_id: i64) -> Result<TokenResponse, AppError> {
    Ok(TokenResponse::bearer(
        create_access_token(settings, user_id)?,
        create_refresh_token(settings, user_id)?,
    ))
}

/// Register a new user
///
/// Creates a `user`-role account and returns an access/refresh token pair.
///
/// ## Responses:
/// - `201 Created`: `TokenResponse`.
/// - `409 Conflict`: the email is already registered.
/// - `422 Unprocessable Entity`: invalid email or password length.
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    settings: web::Data<Settings>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let mut conn = pool.acquire().await?;

    if users::get_user_by_email(&mut conn, &register_data.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let register_data = register_data.into_inner();
    let new_user = NewUser {
        hashed_password: hash_password(&register_data.password)?,
        email: register_data.email,
        full_name: register_data.full_name,
        role: UserRole::User,
        is_active: true,
    };
    let user = users::create_user(&mut conn, &new_user).await?;
    info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(issue_tokens(&settings, user.id)?))
}

/// Login user
///
/// Authenticates with email and password and returns an access/refresh token pair.
///
/// ## Responses:
/// - `200 OK`: `TokenResponse`.
/// - `400 Bad Request`: the account is inactive.
/// - `401 Unauthorized`: unknown email or wrong password.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    settings: web::Data<Settings>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let mut conn = pool.acquire().await?;

    let user = match users::get_user_by_email(&mut conn, &login_data.email).await? {
        Some(user) if verify_password(&login_data.password, &user.hashed_password)? => user,
        _ => return Err(AppError::Unauthorized("Incorrect email or password".into())),
    };

    if !user.is_active {
        return Err(AppError::BadRequest("Inactive user".into()));
    }

    Ok(HttpResponse::Ok().json(issue_tokens(&settings, user.id)?))
}

/// Exchange a refresh token for a new access token.
///
/// ## Responses:
/// - `200 OK`: `AccessTokenResponse`.
/// - `401 Unauthorized`: the refresh token is invalid, expired, not a refresh
///   token, or belongs to a missing or inactive user.
#[post("/refresh")]
pub async fn refresh(
    pool: web::Data<SqlitePool>,
    settings: web::Data<Settings>,
    refresh_data: web::Json<TokenRefreshRequest>,
) -> Result<impl Responder, AppError> {
    let user_id = verify_refresh_token(&settings, &refresh_data.refresh_token)?;

    let mut conn = pool.acquire().await?;
    match users::get_user(&mut conn, user_id).await? {
        Some(user) if user.is_active => {}
        _ => return Err(AppError::Unauthorized(CREDENTIALS_ERROR.into())),
    }

    let access_token = create_access_token(&settings, user_id)?;
    Ok(HttpResponse::Ok().json(AccessTokenResponse::bearer(access_token)))
}

/// The authenticated user's account.
///
/// Mounted behind `AuthMiddleware`.
pub async fn me(
    pool: web::Data<SqlitePool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let user = users::get_user(&mut conn, user_id.0)
        .await?
        .ok_or_else(|| AppError::Unauthorized(CREDENTIALS_ERROR.into()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
