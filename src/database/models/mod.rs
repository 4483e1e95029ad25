pub mod user;

pub use user::{ApnsTokenEntity, OpponentEntity, UserEntity};
