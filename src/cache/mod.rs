// 缓存模块
// 包含缓存数据结构和 Redis 操作

pub mod keys;
pub mod models;
pub mod operations;

pub use models::token::CachedToken;
pub use operations::token::RedisTokenStore;
