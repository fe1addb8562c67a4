use crate::{
    catalog::Student,
    error::{AppError, AppResult},
    AppState,
};
use axum::{routing::get, Extension, Json, Router};

// Backs the dashboard's memberships tab; roster records are fixture-seeded
// and read-only.
async fn me(Extension(state): Extension<AppState>) -> AppResult<Json<Student>> {
    let session = super::require_session(&state).await?;
    state
        .catalog
        .student_by_id(&session.student_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("student record not found"))
}

pub fn app() -> Router {
    Router::new().route("/me", get(me))
}
