use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use thegame_backend::{
    AppState,
    apns::{CredentialStore, Dispatcher, Es256Signer, SystemClock},
    cache::RedisTokenStore,
    config::{Config, TokenStoreKind},
    database::{ApnsTokenRepository, UserRepository},
    router::create_router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'thegame_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // 设置 Redis 客户端
    let redis = Arc::new(
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client"),
    );

    let token_store: Arc<dyn CredentialStore> = match config.token_store {
        TokenStoreKind::Postgres => Arc::new(ApnsTokenRepository::new(pool.clone())),
        TokenStoreKind::Redis => Arc::new(RedisTokenStore::new(redis)),
    };
    tracing::info!("APNs provider tokens stored in {:?}", config.token_store);

    let users = Arc::new(UserRepository::new(pool));
    let dispatcher = Dispatcher::new(
        config.apns.clone(),
        users.clone(),
        token_store,
        Arc::new(Es256Signer::from_config(&config.apns)),
        Arc::new(SystemClock),
    )
    .expect("Failed to initialize APNs dispatcher");

    // 设置应用状态
    let state = AppState {
        dispatcher: Arc::new(dispatcher),
        matches: users,
    };

    let app = create_router(state, &config.api_base_uri);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
