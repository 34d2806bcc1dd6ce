use actix_web::{post, web, HttpResponse, Responder};
use chrono::Utc;
use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;

/// Register a new user
///
/// Creates a new account and returns a bearer token for it. Registration
/// fails with 400 when the email is already taken; the duplicate check and
/// the insert are two store calls, so simultaneous registrations of the same
/// email are not guarded against.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    // Check if email already exists
    if state
        .users
        .find_by_email(&register_data.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password)?;
    let register_data = register_data.into_inner();
    let user = state
        .users
        .create(register_data.name, register_data.email, password_hash)
        .await?;

    let token = state.tokens.issue(&user.email, Utc::now())?;

    Ok(HttpResponse::Created().json(AuthResponse::bearer(token)))
}

/// Login user
///
/// Authenticates by email and password and returns a bearer token. Unknown
/// email and wrong password get the same rejection.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let user = state.users.find_by_email(&login_data.email).await?;

    match user {
        Some(user) if verify_password(&login_data.password, &user.password_hash) => {
            let token = state.tokens.issue(&user.email, Utc::now())?;
            Ok(HttpResponse::Ok().json(AuthResponse::bearer(token)))
        }
        _ => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}
