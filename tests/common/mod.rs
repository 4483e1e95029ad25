#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use thegame_backend::apns::{
    Dispatcher, Es256Signer, ManualClock, MemoryCredentialStore, MemoryDirectory, SignError,
    TokenSigner,
};
use thegame_backend::config::ApnsConfig;
use thegame_backend::database::UserEntity;

pub const KEY_ID: &str = "DYZK645FC9";
pub const TEAM_ID: &str = "642SNV9NK2";
pub const BUNDLE_ID: &str = "com.vmwishes.game.the";
pub const START: i64 = 1_000_007;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn key_path() -> PathBuf {
    fixture("AuthKey_TEST.p8")
}

pub fn public_key_pem() -> Vec<u8> {
    std::fs::read(fixture("AuthKey_TEST.pub.pem")).unwrap()
}

/// 记录签名次数的签名器
pub struct CountingSigner {
    inner: Es256Signer,
    calls: AtomicUsize,
}

impl CountingSigner {
    pub fn new(key_path: PathBuf) -> Self {
        Self {
            inner: Es256Signer::new(KEY_ID, TEAM_ID, key_path),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSigner for CountingSigner {
    async fn sign(&self, issued_at: i64) -> Result<String, SignError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign(issued_at).await
    }
}

pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub directory: Arc<MemoryDirectory>,
    pub store: Arc<MemoryCredentialStore>,
    pub signer: Arc<CountingSigner>,
    pub clock: Arc<ManualClock>,
}

pub fn user(user_id: i64, device_token: Option<&str>) -> UserEntity {
    UserEntity {
        user_id,
        user_key: Some(format!("key-{}", user_id)),
        username: Some(format!("player{}", user_id)),
        device_token: device_token.map(str::to_string),
        ..Default::default()
    }
}

pub fn harness(gateway_url: &str, directory: MemoryDirectory) -> Harness {
    harness_with_key(gateway_url, directory, key_path())
}

pub fn harness_with_key(gateway_url: &str, directory: MemoryDirectory, key: PathBuf) -> Harness {
    let config = ApnsConfig::new(KEY_ID, TEAM_ID, key).with_gateway_url(gateway_url);
    harness_with_config(config, directory)
}

pub fn harness_with_config(config: ApnsConfig, directory: MemoryDirectory) -> Harness {
    let key = config.key_path.clone();
    let directory = Arc::new(directory);
    let store = Arc::new(MemoryCredentialStore::new());
    let signer = Arc::new(CountingSigner::new(key));
    let clock = Arc::new(ManualClock::new(START));

    let dispatcher = Dispatcher::new(
        config,
        directory.clone(),
        store.clone(),
        signer.clone(),
        clock.clone(),
    )
    .unwrap();

    Harness {
        dispatcher: Arc::new(dispatcher),
        directory,
        store,
        signer,
        clock,
    }
}

/// 返回一个当前没有任何监听者的本地地址
pub fn closed_gateway() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
