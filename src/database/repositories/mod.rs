pub mod apns_token;
pub mod user;

pub use apns_token::ApnsTokenRepository;
pub use user::UserRepository;
