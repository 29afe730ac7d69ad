//! Community task board endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use kasilink_core::{Action, TaskId, TaskStatus, authorize, task_transition};

use crate::error::{AppError, AppJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewTask, Task};
use crate::routes::validate;
use crate::state::AppState;

/// Build the tasks router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}/status", patch(update_task_status))
}

/// List all tasks. Public.
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>> {
    let tasks = state.storage().list_tasks().await?;
    Ok(Json(tasks))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskRequest {
    title: String,
    description: String,
    budget: Decimal,
    location: String,
}

/// Post a new task with an offered budget.
async fn create_task(
    State(state): State<AppState>,
    auth: RequireAuth,
    AppJson(body): AppJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    authorize(Some(&auth.actor()), &Action::CreateTask)?;

    validate::non_empty("title", &body.title)?;
    validate::non_empty("description", &body.description)?;
    validate::non_empty("location", &body.location)?;
    let budget = validate::positive_amount("budget", body.budget)?;

    let task = state
        .storage()
        .create_task(NewTask {
            creator_id: auth.user_id().clone(),
            title: body.title,
            description: body.description,
            budget,
            location: body.location,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, Deserialize)]
struct UpdateTaskStatusRequest {
    status: TaskStatus,
}

/// Take or complete a task.
///
/// The transition is computed before authorization so an impossible move
/// yields 409 regardless of who asks.
async fn update_task_status(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<i32>,
    AppJson(body): AppJson<UpdateTaskStatusRequest>,
) -> Result<Json<Task>> {
    let id = TaskId::new(id);
    let task = state
        .storage()
        .get_task(id)
        .await?
        .ok_or(AppError::NotFound("Task"))?;

    let transition = task_transition(task.status, body.status, auth.user_id())?;

    let action = match transition.status {
        TaskStatus::InProgress => Action::TakeTask {
            creator_id: &task.creator_id,
            status: task.status,
        },
        // the lifecycle never yields Open as a target
        TaskStatus::Open | TaskStatus::Completed => Action::CompleteTask {
            creator_id: &task.creator_id,
        },
    };
    authorize(Some(&auth.actor()), &action)?;

    let updated = state
        .storage()
        .apply_task_transition(id, task.status, &transition)
        .await?
        .ok_or(AppError::NotFound("Task"))?;

    Ok(Json(updated))
}
