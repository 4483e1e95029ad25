use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use std::sync::Arc;

use crate::apns::error::StoreError;
use crate::apns::token_cache::CredentialStore;
use crate::cache::keys::apns_token_key;
use crate::cache::models::token::CachedToken;

/// 基于 Redis 的推送签名令牌存储
///
/// 令牌不设置过期时间，有效期由读取方按签发时间判断。
#[derive(Clone)]
pub struct RedisTokenStore {
    redis: Arc<RedisClient>,
}

impl RedisTokenStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl CredentialStore for RedisTokenStore {
    /// 获取令牌缓存
    async fn read_cached_token(&self, issuer_id: &str) -> Result<Option<CachedToken>, StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(apns_token_key(issuer_id)).await?;

        match result {
            Some(json) => {
                let cached_token = serde_json::from_str(&json)
                    .map_err(|e| StoreError::Malformed(e.to_string()))?;
                Ok(Some(cached_token))
            }
            None => Ok(None),
        }
    }

    /// 缓存令牌，覆盖同一签发方的旧值
    async fn write_cached_token(&self, token: &CachedToken) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let json =
            serde_json::to_string(token).map_err(|e| StoreError::Malformed(e.to_string()))?;

        let _: () = conn.set(apns_token_key(&token.issuer_id), json).await?;

        Ok(())
    }
}
