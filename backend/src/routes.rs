use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use shared::{CreateTaskRequest, Task, UpdateTaskRequest};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{error::ApiError, service::TaskService};

pub fn app(service: TaskService, static_dir: &str) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:id",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

// Missing fields, wrong types, and malformed JSON are all the caller's
// fault: 400, not axum's default rejection status.
fn bad_request(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}

async fn list_tasks(State(service): State<TaskService>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(service.list().await?))
}

async fn get_task(
    Path(id): Path<i64>,
    State(service): State<TaskService>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(service.get(id).await?))
}

async fn create_task(
    State(service): State<TaskService>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(request) = payload.map_err(bad_request)?;
    let task = service.create(&request.title).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    Path(id): Path<i64>,
    State(service): State<TaskService>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(request) = payload.map_err(bad_request)?;
    Ok(Json(service.set_completed(id, request.completed).await?))
}

async fn delete_task(
    Path(id): Path<i64>,
    State(service): State<TaskService>,
) -> Result<StatusCode, ApiError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
