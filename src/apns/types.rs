use serde::Serialize;

use crate::utils::result_codes;

/// 通知副标题与正文目前是固定占位文本，只有标题来自调用方
pub const PLACEHOLDER_SUBTITLE: &str = "subtitle";
pub const PLACEHOLDER_BODY: &str = "body";

/// 角标数在 0..20 之间循环
const BADGE_MODULUS: i64 = 20;

/// 单次推送请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub recipient_device_token: String,
    pub title: String,
    pub badge_count: i64,
    pub expires_at: i64,
}

impl NotificationRequest {
    pub fn new(device_token: &str, title: &str, now: i64, ttl_secs: i64) -> Self {
        Self {
            recipient_device_token: device_token.to_string(),
            title: title.to_string(),
            badge_count: badge_count(now),
            expires_at: now + ttl_secs,
        }
    }

    pub fn payload(&self) -> NotificationPayload<'_> {
        NotificationPayload {
            aps: Aps {
                alert: Alert {
                    title: &self.title,
                    subtitle: PLACEHOLDER_SUBTITLE,
                    body: PLACEHOLDER_BODY,
                },
                badge: self.badge_count,
            },
        }
    }
}

pub fn badge_count(now: i64) -> i64 {
    now.rem_euclid(BADGE_MODULUS)
}

/// `{"aps":{"alert":{"title":..,"subtitle":..,"body":..},"badge":..}}`
#[derive(Debug, Serialize)]
pub struct NotificationPayload<'a> {
    pub aps: Aps<'a>,
}

#[derive(Debug, Serialize)]
pub struct Aps<'a> {
    pub alert: Alert<'a>,
    pub badge: i64,
}

#[derive(Debug, Serialize)]
pub struct Alert<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub body: &'a str,
}

/// 单次推送的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DispatchResult {
    Delivered,
    /// 设备令牌为空或已失效
    InvalidRecipient,
    TransportFailure,
    GatewayFailure,
}

impl DispatchResult {
    /// 对外的整数结果码
    pub fn rc(self) -> i32 {
        match self {
            DispatchResult::Delivered => result_codes::SUCCESS,
            DispatchResult::InvalidRecipient => result_codes::NOTIFICATION_FAILURE,
            DispatchResult::TransportFailure => result_codes::CURL_FAILURE,
            DispatchResult::GatewayFailure => result_codes::APNS_FAILURE,
        }
    }
}
