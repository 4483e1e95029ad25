use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    middleware::log_errors,
    routes,
};

// 对局相关的路由
fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/game/poke", post(routes::poke::poke))
        .route("/health", get(routes::health))
}

// 创建主路由
pub fn create_router(state: AppState, api_base_uri: &str) -> Router {
    let base = api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        Router::new().merge(game_routes())
    } else {
        Router::new().nest(base, game_routes())
    };

    let router = router.layer(axum::middleware::from_fn(log_errors));

    // 开发模式下允许所有来源
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
