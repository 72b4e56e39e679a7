use crate::config::Settings;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

/// The single message every credential failure is reported with.
pub const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// Distinguishes short-lived access tokens from refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// The `sub` claim as found on the wire: issued tokens carry a numeric string,
/// but a bare JSON number is accepted too.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Subject {
    Number(i64),
    Text(String),
}

impl Subject {
    pub fn as_user_id(&self) -> Option<i64> {
        match self {
            Subject::Number(id) => Some(*id),
            Subject::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Represents the claims encoded within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token, the user's id. Optional so that a token without it
    /// still decodes and can be rejected by `current_user_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<Subject>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

fn issue_token(
    settings: &Settings,
    user_id: i64,
    token_type: TokenType,
    lifetime: Duration,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: Some(Subject::Text(user_id.to_string())),
        exp: (Utc::now() + lifetime).timestamp(),
        token_type: Some(token_type),
    };

    encode(
        &Header::new(settings.algorithm),
        &claims,
        &EncodingKey::from_secret(settings.secret_key.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Issues an access token that expires after `access_token_expire_minutes`.
pub fn create_access_token(settings: &Settings, user_id: i64) -> Result<String, AppError> {
    issue_token(
        settings,
        user_id,
        TokenType::Access,
        Duration::minutes(settings.access_token_expire_minutes),
    )
}

/// Issues a refresh token that expires after `refresh_token_expire_days`.
pub fn create_refresh_token(settings: &Settings, user_id: i64) -> Result<String, AppError> {
    issue_token(
        settings,
        user_id,
        TokenType::Refresh,
        Duration::days(settings.refresh_token_expire_days),
    )
}

/// Verifies signature, algorithm and expiry, and returns the claims.
///
/// Fails closed: any decoding problem (malformed, expired, bad signature,
/// other algorithm) yields `None`. `exp` is required and checked without leeway.
pub fn decode_token(settings: &Settings, token: &str) -> Option<Claims> {
    let mut validation = Validation::new(settings.algorithm);
    validation.leeway = 0;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret_key.as_bytes()),
        &validation,
    ) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            debug!("Rejected token: {}", e);
            None
        }
    }
}

/// Turns a bearer token into the numeric id of the user it was issued to.
///
/// Decoding failures, a missing `sub` and a non-numeric `sub` are all reported
/// as the same `AppError::Unauthorized`. No database lookup happens here.
pub fn current_user_id(settings: &Settings, token: &str) -> Result<i64, AppError> {
    decode_token(settings, token)
        .and_then(|claims| claims.sub)
        .and_then(|sub| sub.as_user_id())
        .ok_or_else(|| AppError::Unauthorized(CREDENTIALS_ERROR.into()))
}

/// Like `current_user_id`, but only accepts tokens issued by `create_refresh_token`.
pub fn verify_refresh_token(settings: &Settings, token: &str) -> Result<i64, AppError> {
    decode_token(settings, token)
        .filter(|claims| claims.token_type == Some(TokenType::Refresh))
        .and_then(|claims| claims.sub)
        .and_then(|sub| sub.as_user_id())
        .ok_or_else(|| AppError::Unauthorized(CREDENTIALS_ERROR.into()))
}
