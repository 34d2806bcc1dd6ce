use actix_web::{get, HttpResponse, Responder};

use crate::auth::CurrentUser;

/// Current user profile
///
/// Returns the authenticated account without its password hash.
#[get("/me")]
pub async fn me(user: CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(user.0.profile())
}
