/// 与客户端约定的结果码，返回体形如 `{"rc": n}`
pub mod result_codes {
    pub const SUCCESS: i32 = 0;
    pub const INVALID_USERKEY: i32 = 1;
    pub const INVALID_OPPONENT: i32 = 2;
    pub const NOTIFICATION_FAILURE: i32 = 3;
    pub const CURL_FAILURE: i32 = 4;
    pub const APNS_FAILURE: i32 = 5;
}

/// 日志中只保留设备令牌前 8 个字符
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(8) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}
