use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::CREDENTIALS_ERROR;
use crate::error::AppError;

/// The id of the user whose bearer token `AuthMiddleware` verified.
///
/// Only meaningful on routes wrapped by `AuthMiddleware`; elsewhere extraction
/// fails with `AppError::Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUserId(pub i64);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUserId>().copied() {
            Some(user_id) => ready(Ok(user_id)),
            None => {
                log::warn!("No authenticated user on {}; is AuthMiddleware applied?", req.path());
                let err = AppError::Unauthorized(CREDENTIALS_ERROR.into());
                ready(Err(err.into()))
            }
        }
    }
}
