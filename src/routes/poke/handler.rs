use axum::extract::{Json, State};

use crate::{AppState, error::AppError, result::ApiResult};

use super::model::{PokeRequest, poke_opponent};

#[axum::debug_handler]
pub async fn poke(
    State(state): State<AppState>,
    Json(req): Json<PokeRequest>,
) -> Result<Json<ApiResult>, AppError> {
    let result = poke_opponent(state.matches.as_ref(), &state.dispatcher, &req).await?;
    Ok(Json(result))
}
