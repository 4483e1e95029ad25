// 缓存键模块

/// 推送签名令牌缓存键前缀
const APNS_TOKEN_PREFIX: &str = "apns:token:";

/// 生成推送签名令牌缓存键
pub fn apns_token_key(issuer_id: &str) -> String {
    format!("{}{}", APNS_TOKEN_PREFIX, issuer_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed() {
        assert_eq!(apns_token_key("DYZK645FC9"), "apns:token:DYZK645FC9");
    }
}
