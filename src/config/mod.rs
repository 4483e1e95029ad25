use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

const SANDBOX_GATEWAY: &str = "https://api.sandbox.push.apple.com:443";
const PRODUCTION_GATEWAY: &str = "https://api.push.apple.com:443";
const DEFAULT_BUNDLE_ID: &str = "com.vmwishes.game.the";

/// 缓存的签名令牌有效期（40 分钟）
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 2400;
/// 推送通知有效期（3 天）
pub const DEFAULT_NOTIFICATION_TTL_SECS: i64 = 3 * 86400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStoreKind {
    Postgres,
    Redis,
}

impl FromStr for TokenStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(TokenStoreKind::Postgres),
            "redis" => Ok(TokenStoreKind::Redis),
            other => Err(format!("unknown token store: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub token_store: TokenStoreKind,
    pub apns: ApnsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let token_store = optional_var("APNS_TOKEN_STORE")
            .and_then(|v| match v.parse() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    tracing::warn!("{}, falling back to postgres", e);
                    None
                }
            })
            .unwrap_or(TokenStoreKind::Postgres);

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: parse_var("SERVER_PORT", 3000),
            api_base_uri: optional_var("API_BASE_URI").unwrap_or_else(|| "/api".to_string()),
            token_store,
            apns: ApnsConfig::from_env()?,
        })
    }
}

/// APNs 推送配置
#[derive(Debug, Clone)]
pub struct ApnsConfig {
    /// 签名密钥标识（JWT 头部的 kid，同时作为令牌缓存的键）
    pub key_id: String,
    /// 开发者团队标识（JWT 的 iss）
    pub team_id: String,
    /// 应用包名，用作 apns-topic
    pub bundle_id: String,
    /// .p8 私钥文件路径
    pub key_path: PathBuf,
    /// 推送网关地址，不含路径
    pub gateway_url: String,
    pub token_ttl_secs: i64,
    pub notification_ttl_secs: i64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl ApnsConfig {
    /// 使用默认值创建沙盒环境配置
    pub fn new(
        key_id: impl Into<String>,
        team_id: impl Into<String>,
        key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            team_id: team_id.into(),
            bundle_id: DEFAULT_BUNDLE_ID.to_string(),
            key_path: key_path.into(),
            gateway_url: SANDBOX_GATEWAY.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            notification_ttl_secs: DEFAULT_NOTIFICATION_TTL_SECS,
            connect_timeout_secs: 5,
            request_timeout_secs: 10,
        }
    }

    pub fn from_env() -> Result<Self, env::VarError> {
        let mut apns = ApnsConfig::new(
            env::var("APNS_KEY_ID")?,
            env::var("APNS_TEAM_ID")?,
            env::var("APNS_KEY_PATH")?,
        );

        if let Some(bundle_id) = optional_var("APNS_BUNDLE_ID") {
            apns.bundle_id = bundle_id;
        }
        if parse_var("APNS_PRODUCTION", false) {
            apns.gateway_url = PRODUCTION_GATEWAY.to_string();
        }
        if let Some(gateway_url) = optional_var("APNS_GATEWAY_URL") {
            apns.gateway_url = gateway_url;
        }
        apns.token_ttl_secs = parse_var("APNS_TOKEN_TTL", DEFAULT_TOKEN_TTL_SECS);
        apns.notification_ttl_secs =
            parse_var("APNS_NOTIFICATION_TTL", DEFAULT_NOTIFICATION_TTL_SECS);
        apns.connect_timeout_secs = parse_var("APNS_CONNECT_TIMEOUT", 5);
        apns.request_timeout_secs = parse_var("APNS_REQUEST_TIMEOUT", 10);

        Ok(apns)
    }

    pub fn with_gateway_url(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = gateway_url.into();
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 设备推送地址：`{gateway}/3/device/{device_token}`
    ///
    /// 设备令牌作为单个路径段编码，不能改变请求路径；网关地址无法作为基础地址时返回 `None`。
    pub fn device_url(&self, device_token: &str) -> Option<Url> {
        let mut url = Url::parse(&self.gateway_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["3", "device", device_token]);
        Some(url)
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    optional_var(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let apns = ApnsConfig::new("KEY123", "TEAM456", "/tmp/key.p8");
        assert_eq!(apns.token_ttl_secs, 2400);
        assert_eq!(apns.notification_ttl_secs, 259_200);
        assert_eq!(apns.bundle_id, "com.vmwishes.game.the");
        assert_eq!(apns.gateway_url, "https://api.sandbox.push.apple.com:443");
    }

    #[test]
    fn device_url_joins_without_double_slash() {
        let apns = ApnsConfig::new("K", "T", "/k.p8").with_gateway_url("http://127.0.0.1:9000/");
        assert_eq!(
            apns.device_url("abcd").unwrap().as_str(),
            "http://127.0.0.1:9000/3/device/abcd"
        );
    }

    #[test]
    fn device_token_stays_inside_its_path_segment() {
        let apns = ApnsConfig::new("K", "T", "/k.p8").with_gateway_url("http://localhost");
        let url = apns.device_url("ab/../../x?y#z").unwrap();
        assert_eq!(url.path(), "/3/device/ab%2F..%2F..%2Fx%3Fy%23z");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn unusable_gateway_has_no_device_url() {
        let apns = ApnsConfig::new("K", "T", "/k.p8").with_gateway_url("not a url");
        assert!(apns.device_url("abcd").is_none());
    }

    #[test]
    fn token_store_kind_parses() {
        assert_eq!("redis".parse::<TokenStoreKind>(), Ok(TokenStoreKind::Redis));
        assert_eq!(" Postgres ".parse::<TokenStoreKind>(), Ok(TokenStoreKind::Postgres));
        assert!("memcached".parse::<TokenStoreKind>().is_err());
    }
}
