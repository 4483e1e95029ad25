use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::apns::{DirectoryError, DispatchError};

#[derive(Debug)]
pub enum AppError {
    /// 查询参数指向的数据不存在或不唯一
    NotFound(String),
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    code: i32,
    error_message: String,
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        match &e {
            DispatchError::UnknownRecipient(_) | DispatchError::AmbiguousRecipient { .. } => {
                AppError::NotFound(e.to_string())
            }
            _ => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Backend(msg) => AppError::InternalServerError(msg),
            other => AppError::NotFound(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => {
                tracing::error!("API Error: {}", msg);
                (StatusCode::NOT_FOUND, "请求的数据不存在".to_string())
            }
            AppError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("内部服务器错误: {}", msg))
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16() as i32,
            error_message,
        });

        (status, body).into_response()
    }
}
