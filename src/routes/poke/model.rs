use serde::Deserialize;

use crate::apns::{Dispatcher, MatchDirectory};
use crate::error::AppError;
use crate::result::ApiResult;
use crate::utils::result_codes;

#[derive(Debug, Deserialize)]
pub struct PokeRequest {
    pub userkey: String,
    pub match_id: i64,
}

pub fn poke_message(sender_name: &str) -> String {
    format!("You have been poked by {}", sender_name)
}

/// 提醒对局中的对手：查出发起方与对手，然后向对手推送通知
pub async fn poke_opponent(
    matches: &dyn MatchDirectory,
    dispatcher: &Dispatcher,
    req: &PokeRequest,
) -> Result<ApiResult, AppError> {
    if req.userkey.trim().is_empty() {
        return Err(AppError::NotFound("Missing userkey".to_string()));
    }

    let Some(sender) = matches.find_user_by_userkey(&req.userkey).await? else {
        return Ok(ApiResult::failure(result_codes::INVALID_USERKEY));
    };

    let Some(sender_name) = sender.display_name() else {
        return Err(AppError::NotFound(format!(
            "Cannot resolve user {} to a user name or alias",
            sender.user_id
        )));
    };

    let Some(opponent) = matches.find_opponent(req.match_id, sender.user_id).await? else {
        tracing::debug!(
            match_id = req.match_id,
            user_id = sender.user_id,
            "No opponent for match"
        );
        return Ok(ApiResult::failure(result_codes::INVALID_OPPONENT));
    };

    let result = dispatcher.send(opponent, &poke_message(sender_name)).await?;
    tracing::info!(
        match_id = req.match_id,
        from = sender.user_id,
        to = opponent,
        result = ?result,
        "Poke dispatched"
    );

    Ok(ApiResult::from_rc(result.rc()))
}
