use async_trait::async_trait;
use sqlx::PgPool;

use crate::apns::directory::{MatchDirectory, UserDirectory, exactly_one};
use crate::apns::error::DirectoryError;
use crate::database::models::user::{OpponentEntity, UserEntity};

const USER_COLUMNS: &str = "userid, userkey, username, alias, fbid, fbname, devtoken";

/// 用户存储库实现
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 根据ID查找用户，返回全部匹配行以便调用方发现重复数据
    pub async fn find_all_by_id(&self, user_id: i64) -> Result<Vec<UserEntity>, sqlx::Error> {
        let sql = format!("SELECT {} FROM tg_users WHERE userid = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserEntity>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    /// 根据 userkey 查找用户
    pub async fn find_by_userkey(&self, user_key: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let sql = format!("SELECT {} FROM tg_users WHERE userkey = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserEntity>(&sql)
            .bind(user_key)
            .fetch_optional(&self.pool)
            .await
    }

    /// 查找用户在对局中的对手
    pub async fn find_opponent_row(
        &self,
        match_id: i64,
        user_id: i64,
    ) -> Result<Option<OpponentEntity>, sqlx::Error> {
        sqlx::query_as::<_, OpponentEntity>(
            r#"
            SELECT match_id, userid, opponent
            FROM tg_user_opponents
            WHERE match_id = $1 AND userid = $2
            "#,
        )
        .bind(match_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_user_by_id(&self, user_id: i64) -> Result<UserEntity, DirectoryError> {
        let rows = self.find_all_by_id(user_id).await?;
        exactly_one(user_id, rows)
    }
}

#[async_trait]
impl MatchDirectory for UserRepository {
    async fn find_user_by_userkey(
        &self,
        user_key: &str,
    ) -> Result<Option<UserEntity>, DirectoryError> {
        Ok(self.find_by_userkey(user_key).await?)
    }

    async fn find_opponent(
        &self,
        match_id: i64,
        user_id: i64,
    ) -> Result<Option<i64>, DirectoryError> {
        let row = self.find_opponent_row(match_id, user_id).await?;
        Ok(row.map(|r| r.opponent))
    }
}
