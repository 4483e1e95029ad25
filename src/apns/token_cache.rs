//! 提供方令牌缓存：令牌签发有成本，在有效期内复用已存储的令牌

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::clock::Clock;
use super::error::{DispatchError, StoreError};
use super::signer::TokenSigner;
use crate::cache::CachedToken;

/// 令牌持久化存储，每个 issuer_id 只保留一条记录
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn read_cached_token(&self, issuer_id: &str) -> Result<Option<CachedToken>, StoreError>;

    /// 写入（或替换）issuer_id 对应的令牌
    async fn write_cached_token(&self, token: &CachedToken) -> Result<(), StoreError>;
}

/// 进程内令牌存储
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    tokens: Mutex<HashMap<String, CachedToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn read_cached_token(&self, issuer_id: &str) -> Result<Option<CachedToken>, StoreError> {
        let tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        let token = tokens.get(issuer_id).cloned();
        Ok(token)
    }

    async fn write_cached_token(&self, token: &CachedToken) -> Result<(), StoreError> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(token.issuer_id.clone(), token.clone());
        Ok(())
    }
}

/// 带过期策略的令牌缓存
///
/// 过期在读取时按当前时间惰性计算，没有主动失效接口。
/// 并发请求同时越过过期边界时可能各自签发并写入，后写者覆盖，两个令牌都有效。
pub struct TokenCache {
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    ttl_secs: i64,
}

impl TokenCache {
    pub fn new(store: Arc<dyn CredentialStore>, clock: Arc<dyn Clock>, ttl_secs: i64) -> Self {
        Self {
            store,
            clock,
            ttl_secs,
        }
    }

    /// 返回仍在有效期内的令牌，过期或不存在时重新签发并持久化
    pub async fn get_valid_token(
        &self,
        issuer_id: &str,
        signer: &dyn TokenSigner,
    ) -> Result<String, DispatchError> {
        let now = self.clock.now();

        if let Some(cached) = self.store.read_cached_token(issuer_id).await? {
            if cached.is_fresh(now, self.ttl_secs) {
                return Ok(cached.token_value);
            }
            tracing::debug!(
                issuer_id,
                minted_at = cached.minted_at,
                "Cached provider token expired"
            );
        }

        let token_value = signer.sign(now).await?;
        let cached = CachedToken::new(issuer_id, token_value, now);
        self.store.write_cached_token(&cached).await?;

        tracing::info!(issuer_id, minted_at = now, "Minted provider token");
        Ok(cached.token_value)
    }
}
