use axum::Router;

use crate::{
    error::{AppError, AppResult},
    session::Session,
    AppState,
};

pub mod application;
pub mod auth;
pub mod club;
pub mod student;

pub fn app() -> Router {
    Router::new()
        .nest("/auth", auth::app())
        .nest("/club", club::app())
        .nest("/application", application::app())
        .nest("/student", student::app())
}

pub(crate) async fn require_session(state: &AppState) -> AppResult<Session> {
    state
        .sessions
        .current()
        .await
        .ok_or_else(|| AppError::unauthorized("sign in with your school email first"))
}
