use serde::{Deserialize, Serialize};

/// 推送服务签名令牌缓存模型，每个签发方只保留一条
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub issuer_id: String,
    pub token_value: String,
    pub minted_at: i64, // Unix timestamp
}

impl CachedToken {
    pub fn new(issuer_id: &str, token_value: String, minted_at: i64) -> Self {
        Self {
            issuer_id: issuer_id.to_string(),
            token_value,
            minted_at,
        }
    }

    /// 令牌自签发起是否仍在有效期内
    pub fn is_fresh(&self, now: i64, ttl_secs: i64) -> bool {
        now - self.minted_at < ttl_secs
    }
}
