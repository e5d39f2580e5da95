use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::session::{AuthUser, CurrentUser},
    error::AppError,
    state::AppState,
    tasks::dto::TaskForm,
    views,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/add", post(add_task))
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    added: Option<u8>,
    error: Option<String>,
}

/// Task list for the current user; anonymous visitors are sent to login.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<IndexQuery>,
) -> Result<Response, AppError> {
    let Some(user) = user.0 else {
        return Ok(Redirect::to("/login").into_response());
    };

    let tasks = state.tasks.list_for_owner(user.id).await?;

    let notice = if query.added.is_some() {
        Some("New task has been added!")
    } else if query.error.is_some() {
        Some("Failed to add task. Please try again.")
    } else {
        None
    };

    Ok(views::tasks_page(&user, &tasks, notice).into_response())
}

#[instrument(skip(state, user, form))]
pub async fn add_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Form(form): Form<TaskForm>,
) -> Result<Redirect, AppError> {
    if form.validate().is_err() {
        warn!(user_id = %user.id, "task form invalid");
        return Ok(Redirect::to("/?error=empty"));
    }

    match state.tasks.add(user.id, &form.description).await {
        Ok(task) => {
            info!(user_id = %user.id, task_id = %task.id, "task added");
            Ok(Redirect::to("/?added=1"))
        }
        // The store re-checks the description; signal the failure instead of
        // dropping the submission silently.
        Err(AppError::Validation(_)) => Ok(Redirect::to("/?error=empty")),
        Err(e) => Err(e),
    }
}
