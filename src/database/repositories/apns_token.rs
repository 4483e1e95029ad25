use async_trait::async_trait;
use sqlx::PgPool;

use crate::apns::error::StoreError;
use crate::apns::token_cache::CredentialStore;
use crate::cache::CachedToken;
use crate::database::models::user::ApnsTokenEntity;

/// 推送签名令牌存储库（tg_apns_token），每个 id 一行
#[derive(Clone)]
pub struct ApnsTokenRepository {
    pool: PgPool,
}

impl ApnsTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<ApnsTokenEntity> for CachedToken {
    fn from(row: ApnsTokenEntity) -> Self {
        CachedToken {
            issuer_id: row.id,
            token_value: row.token,
            minted_at: row.created,
        }
    }
}

#[async_trait]
impl CredentialStore for ApnsTokenRepository {
    async fn read_cached_token(&self, issuer_id: &str) -> Result<Option<CachedToken>, StoreError> {
        let row = sqlx::query_as::<_, ApnsTokenEntity>(
            "SELECT id, token, created FROM tg_apns_token WHERE id = $1",
        )
        .bind(issuer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CachedToken::from))
    }

    async fn write_cached_token(&self, token: &CachedToken) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tg_apns_token (id, token, created)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET token = EXCLUDED.token, created = EXCLUDED.created
            "#,
        )
        .bind(&token.issuer_id)
        .bind(&token.token_value)
        .bind(token.minted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
