//! 推送服务提供方令牌签名（ES256 JWT）

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::error::SignError;
use crate::config::ApnsConfig;

/// 提供方令牌声明
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderClaims {
    pub iss: String, // 团队标识
    pub iat: i64,    // 签发时间
}

/// 为给定签发时间生成提供方令牌
#[async_trait]
pub trait TokenSigner: Send + Sync {
    async fn sign(&self, issued_at: i64) -> Result<String, SignError>;
}

/// 用 PEM 格式的 EC 私钥签发令牌，头部携带 `kid`
pub fn sign_provider_token(
    key_id: &str,
    team_id: &str,
    issued_at: i64,
    key_pem: &[u8],
) -> Result<String, SignError> {
    let key = EncodingKey::from_ec_pem(key_pem).map_err(|e| SignError::KeyParse {
        reason: e.to_string(),
    })?;

    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(key_id.to_string());

    let claims = ProviderClaims {
        iss: team_id.to_string(),
        iat: issued_at,
    };

    jsonwebtoken::encode(&header, &claims, &key).map_err(|e| SignError::Sign {
        reason: e.to_string(),
    })
}

/// 每次签名时从磁盘读取 .p8 私钥的签名器
#[derive(Debug, Clone)]
pub struct Es256Signer {
    key_id: String,
    team_id: String,
    key_path: PathBuf,
}

impl Es256Signer {
    pub fn new(key_id: &str, team_id: &str, key_path: impl AsRef<Path>) -> Self {
        Self {
            key_id: key_id.to_string(),
            team_id: team_id.to_string(),
            key_path: key_path.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &ApnsConfig) -> Self {
        Self::new(&config.key_id, &config.team_id, &config.key_path)
    }
}

#[async_trait]
impl TokenSigner for Es256Signer {
    async fn sign(&self, issued_at: i64) -> Result<String, SignError> {
        let key_pem = tokio::fs::read(&self.key_path).await.map_err(|e| SignError::KeyRead {
            path: self.key_path.display().to_string(),
            reason: e.to_string(),
        })?;

        let token = sign_provider_token(&self.key_id, &self.team_id, issued_at, &key_pem)?;
        tracing::debug!(key_id = %self.key_id, issued_at, "Signed new APNs provider token");
        Ok(token)
    }
}
