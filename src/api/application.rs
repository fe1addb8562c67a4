use crate::{
    applications::{Application, ApplicationError, NewApplication},
    error::{AppError, AppResult},
    AppState,
};
use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Serialize;

fn reject(err: ApplicationError) -> AppError {
    let code = match err {
        ApplicationError::UnknownClub | ApplicationError::NotFound => StatusCode::NOT_FOUND,
        ApplicationError::ClubClosed(_) => StatusCode::CONFLICT,
        ApplicationError::Invalid(_) => StatusCode::BAD_REQUEST,
    };
    AppError::from(code, err.to_string())
}

async fn list(Extension(state): Extension<AppState>) -> AppResult<Json<Vec<Application>>> {
    let session = super::require_session(&state).await?;
    Ok(Json(state.applications.list(&session.email).await))
}

async fn submit(
    Extension(state): Extension<AppState>,
    Json(req): Json<NewApplication>,
) -> AppResult<Json<Application>> {
    super::require_session(&state).await?;
    state.applications.create(req).await.map(Json).map_err(reject)
}

async fn advance(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Application>> {
    super::require_session(&state).await?;
    state.applications.advance(&id).await.map(Json).map_err(reject)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawResponse {
    removed: bool,
}

async fn withdraw(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<WithdrawResponse>> {
    super::require_session(&state).await?;
    Ok(Json(WithdrawResponse {
        removed: state.applications.delete(&id).await,
    }))
}

async fn existing(
    Extension(state): Extension<AppState>,
    Path(club_id): Path<String>,
) -> AppResult<Json<Application>> {
    let session = super::require_session(&state).await?;
    state
        .applications
        .find_existing(&club_id, &session.email)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("no application for this club yet"))
}

pub fn app() -> Router {
    Router::new()
        .route("/list", get(list))
        .route("/submit", post(submit))
        .route("/existing/:club_id", get(existing))
        .route("/:id/advance", post(advance))
        .route("/:id", delete(withdraw))
}
