//! Apple 推送通知分发
//!
//! - [`TokenCache`]：缓存并按需重新签发提供方令牌
//! - [`Es256Signer`]：用 .p8 私钥签发 ES256 JWT
//! - [`Dispatcher`]：构造通知、请求网关并分类结果

pub mod clock;
pub mod directory;
pub mod error;
pub mod sender;
pub mod signer;
pub mod token_cache;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use directory::{MatchDirectory, MemoryDirectory, UserDirectory};
pub use error::{DirectoryError, DispatchError, SignError, StoreError};
pub use sender::Dispatcher;
pub use signer::{Es256Signer, ProviderClaims, TokenSigner, sign_provider_token};
pub use token_cache::{CredentialStore, MemoryCredentialStore, TokenCache};
pub use types::{DispatchResult, NotificationRequest};
