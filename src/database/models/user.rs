use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户数据库实体（tg_users）
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct UserEntity {
    #[sqlx(rename = "userid")]
    pub user_id: i64,
    #[sqlx(rename = "userkey")]
    pub user_key: Option<String>,
    pub username: Option<String>,
    pub alias: Option<String>,
    #[sqlx(rename = "fbid")]
    pub fb_id: Option<String>,
    #[sqlx(rename = "fbname")]
    pub fb_name: Option<String>,
    /// 推送设备令牌，未注册设备时为空
    #[sqlx(rename = "devtoken")]
    pub device_token: Option<String>,
}

impl UserEntity {
    /// 非空的设备令牌
    pub fn device_token(&self) -> Option<&str> {
        self.device_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// 对外展示的名字：已绑定 Facebook 时用 Facebook 名字，其次是别名，最后是用户名
    ///
    /// 空字符串视为未设置。
    pub fn display_name(&self) -> Option<&str> {
        fn non_empty(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }

        match (non_empty(&self.fb_id), non_empty(&self.fb_name)) {
            (Some(_), Some(fb_name)) => Some(fb_name),
            _ => non_empty(&self.alias).or_else(|| non_empty(&self.username)),
        }
    }
}

/// 对局对手关系（tg_user_opponents）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OpponentEntity {
    pub match_id: i64,
    #[sqlx(rename = "userid")]
    pub user_id: i64,
    pub opponent: i64,
}

/// 推送签名令牌记录（tg_apns_token）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApnsTokenEntity {
    pub id: String,
    pub token: String,
    pub created: i64,
}
