use crate::{
    error::{AppError, AppResult},
    session::{LoginOutcome, Session},
    AppState,
};
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    message: String,
    session: Session,
}

async fn login(
    Extension(state): Extension<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    match state.sessions.login(&req.email).await {
        LoginOutcome::Success { session, message } => Ok(Json(LoginResponse { message, session })),
        LoginOutcome::Failure { message } => Err(AppError::unauthorized(message)),
    }
}

async fn logout(Extension(state): Extension<AppState>) -> Json<()> {
    state.sessions.logout().await;
    Json(())
}

async fn me(Extension(state): Extension<AppState>) -> AppResult<Json<Session>> {
    state
        .sessions
        .current()
        .await
        .map(Json)
        .ok_or_else(|| AppError::unauthorized("not signed in"))
}

pub fn app() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
