use crate::{
    catalog::{Club, ClubFilter},
    error::{AppError, AppResult},
    AppState,
};
use axum::{
    extract::{Path, Query},
    routing::get,
    Extension, Json, Router,
};

async fn list(
    Extension(state): Extension<AppState>,
    Query(filter): Query<ClubFilter>,
) -> Json<Vec<Club>> {
    Json(
        state
            .catalog
            .filter_clubs(&filter)
            .into_iter()
            .cloned()
            .collect(),
    )
}

async fn info(
    Extension(state): Extension<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<Club>> {
    state
        .catalog
        .find_club(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("the club does not exist"))
}

async fn list_tags(Extension(state): Extension<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.tags())
}

pub fn app() -> Router {
    Router::new()
        .route("/list", get(list))
        .route("/info/:key", get(info))
        .route("/tags/list", get(list_tags))
}
