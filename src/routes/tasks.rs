use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::models::{TaskAssignment, TaskInput, TaskPatch, TaskQuery, TaskStatus, TaskStatusUpdate};
use crate::state::AppState;

/// Retrieves the authenticated user's tasks.
///
/// Only tasks owned by the caller are ever returned, whatever the filters.
///
/// ## Query Parameters:
/// - `status` (optional): exact status to match, one of `todo`,
///   `in-progress`, `done`, `blocked`. Anything else is rejected.
/// - `assignee` (optional): id of the assigned user.
/// - `sort` (optional): field to sort ascending by; defaults to `created_at`.
///   Unknown fields are rejected rather than silently ignored.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `400 Bad Request`: Unknown status or sort field.
/// - `401 Unauthorized`: Missing or invalid bearer token.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    query: web::Query<TaskQuery>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list(user.0.id, &query).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`: `title`, `description`, `status`,
/// `priority` are required; `due_date`, `tags` and `assignee_id` optional.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, with server-assigned id and timestamps.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `422 Unprocessable Entity`: field validation failed.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    // Validate input
    task_data.validate()?;

    let task = state
        .tasks
        .create(task_data.into_inner(), user.0.id)
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task by id. Tasks owned by someone else answer 404, the
/// same as tasks that do not exist.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get(task_id.into_inner(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task the caller owns.
///
/// Patch semantics: only the fields present in the body change, everything
/// else keeps its value. `updated_at` is refreshed on every successful call.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `401 Unauthorized`: Missing or invalid bearer token.
/// - `404 Not Found`: no such task, or not owned by the caller.
/// - `422 Unprocessable Entity`: field validation failed.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    patch: web::Json<TaskPatch>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let task = state
        .tasks
        .update(task_id.into_inner(), user.0.id, patch.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the caller owns. Deleting an unknown or foreign id is 404,
/// not a silent success.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    state.tasks.delete(task_id.into_inner(), user.0.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Moves a task to a new status. The status arrives as a string and must be
/// in the closed set; anything else is a 400.
#[patch("/{id}/status")]
pub async fn update_task_status(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    body: web::Json<TaskStatusUpdate>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let status: TaskStatus = body.status.parse()?;

    let task = state
        .tasks
        .set_status(task_id.into_inner(), user.0.id, status)
        .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Assigns a task to a user id. The assignee is not checked against the
/// directory, so assignments may dangle.
#[patch("/{id}/assign")]
pub async fn assign_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    body: web::Json<TaskAssignment>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .set_assignee(task_id.into_inner(), user.0.id, body.assignee_id)
        .await?;

    Ok(HttpResponse::Ok().json(task))
}
