use thiserror::Error;

/// 签名令牌生成错误
#[derive(Debug, Error)]
pub enum SignError {
    #[error("failed to read APNs key at {path}: {reason}")]
    KeyRead { path: String, reason: String },

    #[error("failed to parse APNs key: {reason}")]
    KeyParse { reason: String },

    #[error("failed to sign provider token: {reason}")]
    Sign { reason: String },
}

/// 令牌存储读写错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("malformed cached token: {0}")]
    Malformed(String),
}

/// 用户目录查询错误
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("no user record for id {0}")]
    NotFound(i64),

    #[error("{count} user records for id {user_id}")]
    Ambiguous { user_id: i64, count: usize },

    #[error("directory backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for DirectoryError {
    fn from(e: sqlx::Error) -> Self {
        DirectoryError::Backend(e.to_string())
    }
}

/// 推送分发错误：这些情况不会产生 DispatchResult
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid target id ({0})")]
    UnknownRecipient(i64),

    #[error("multiple entries ({count}) for user id {user_id}")]
    AmbiguousRecipient { user_id: i64, count: usize },

    #[error(transparent)]
    Signing(#[from] SignError),

    #[error("token store: {0}")]
    Store(#[from] StoreError),

    #[error("user directory: {0}")]
    Directory(String),

    #[error("failed to encode notification payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("invalid APNs gateway url: {0}")]
    InvalidGateway(String),
}

impl From<DirectoryError> for DispatchError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::NotFound(user_id) => DispatchError::UnknownRecipient(user_id),
            DirectoryError::Ambiguous { user_id, count } => {
                DispatchError::AmbiguousRecipient { user_id, count }
            }
            DirectoryError::Backend(msg) => DispatchError::Directory(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_errors_map_to_recipient_errors() {
        let err: DispatchError = DirectoryError::NotFound(42).into();
        assert!(matches!(err, DispatchError::UnknownRecipient(42)));

        let err: DispatchError = DirectoryError::Ambiguous { user_id: 7, count: 2 }.into();
        assert!(matches!(
            err,
            DispatchError::AmbiguousRecipient { user_id: 7, count: 2 }
        ));
    }

    #[test]
    fn sign_error_display_names_path() {
        let err = SignError::KeyRead {
            path: "/keys/apnkey.p8".to_string(),
            reason: "not found".to_string(),
        };
        assert!(err.to_string().contains("/keys/apnkey.p8"));
    }
}
