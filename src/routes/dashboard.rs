use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Dashboard overview
///
/// Per-status task counts (zeros included) plus at most five of the caller's
/// tasks due within the next seven days, ascending by due date.
#[get("/overview")]
pub async fn overview(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let overview = state.dashboard.overview(user.0.id, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(overview))
}
