use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// Extracts the authenticated user from request extensions.
///
/// Intended for routes behind `AuthMiddleware`, which resolves the bearer
/// token and inserts the `User` into request extensions. If no user is
/// present the extractor answers `Unauthorized` rather than panicking, so a
/// route mistakenly mounted outside the middleware fails closed.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => {
                let err = AppError::Unauthorized(
                    "No authenticated user attached to request".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
