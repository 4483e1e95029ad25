use std::sync::Arc;

use apns::{Dispatcher, MatchDirectory};

pub mod apns;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub matches: Arc<dyn MatchDirectory>,
}
