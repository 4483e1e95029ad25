//! 推送分发依赖的用户目录

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::error::DirectoryError;
use crate::database::models::user::{OpponentEntity, UserEntity};

/// 按用户 ID 查询接收方记录
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 恰好匹配一条记录时返回，零条为 NotFound，多条为 Ambiguous
    async fn find_user_by_id(&self, user_id: i64) -> Result<UserEntity, DirectoryError>;
}

/// 对局相关查询
#[async_trait]
pub trait MatchDirectory: Send + Sync {
    async fn find_user_by_userkey(
        &self,
        user_key: &str,
    ) -> Result<Option<UserEntity>, DirectoryError>;

    /// 查询用户在某局对局中的对手 ID
    async fn find_opponent(
        &self,
        match_id: i64,
        user_id: i64,
    ) -> Result<Option<i64>, DirectoryError>;
}

/// 将查询结果收敛为唯一一条记录
pub fn exactly_one(user_id: i64, mut rows: Vec<UserEntity>) -> Result<UserEntity, DirectoryError> {
    match rows.len() {
        0 => Err(DirectoryError::NotFound(user_id)),
        1 => Ok(rows.remove(0)),
        count => Err(DirectoryError::Ambiguous { user_id, count }),
    }
}

/// 进程内用户目录
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: Mutex<Vec<UserEntity>>,
    opponents: Mutex<Vec<OpponentEntity>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: UserEntity) -> Self {
        self.insert_user(user);
        self
    }

    pub fn with_opponent(self, match_id: i64, user_id: i64, opponent: i64) -> Self {
        self.opponents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(OpponentEntity {
                match_id,
                user_id,
                opponent,
            });
        self
    }

    /// 允许重复插入同一 ID，用于复现数据不一致
    pub fn insert_user(&self, user: UserEntity) {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(user);
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn find_user_by_id(&self, user_id: i64) -> Result<UserEntity, DirectoryError> {
        let rows: Vec<UserEntity> = self
            .users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|u| u.user_id == user_id)
            .cloned()
            .collect();
        exactly_one(user_id, rows)
    }
}

#[async_trait]
impl MatchDirectory for MemoryDirectory {
    async fn find_user_by_userkey(
        &self,
        user_key: &str,
    ) -> Result<Option<UserEntity>, DirectoryError> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        let user = users
            .iter()
            .find(|u| u.user_key.as_deref() == Some(user_key))
            .cloned();
        Ok(user)
    }

    async fn find_opponent(
        &self,
        match_id: i64,
        user_id: i64,
    ) -> Result<Option<i64>, DirectoryError> {
        let opponents = self.opponents.lock().unwrap_or_else(PoisonError::into_inner);
        let opponent = opponents
            .iter()
            .find(|o| o.match_id == match_id && o.user_id == user_id)
            .map(|o| o.opponent);
        Ok(opponent)
    }
}
