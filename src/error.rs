use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Errors crossing the HTTP boundary. `Internal` covers anything unexpected
/// and renders as a generic 500 after logging; `Status` carries a
/// user-visible message and the code it renders with.
pub enum AppError {
    Internal(anyhow::Error),
    Status(StatusCode, Cow<'static, str>),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: Cow<'static, str>,
}

impl AppError {
    pub fn from(code: StatusCode, message: impl Into<Cow<'static, str>>) -> AppError {
        AppError::Status(code, message.into())
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> AppError {
        AppError::from(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> AppError {
        AppError::from(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Internal(err) => {
                error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Cow::from("Internal Server Error"),
                )
            }
            AppError::Status(code, message) => (code, message),
        };
        (
            code,
            Json(ErrorBody {
                status: code.as_u16(),
                message,
            }),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> AppError {
        AppError::Internal(e.into())
    }
}
