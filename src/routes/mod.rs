use axum::Json;

use crate::result::ApiResult;

pub mod poke;

/// 存活检查
pub async fn health() -> Json<ApiResult> {
    Json(ApiResult::success())
}
