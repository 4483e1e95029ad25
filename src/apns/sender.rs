//! 推送发送：查询接收方、获取令牌、发起一次请求并分类结果
//!
//! 发送过程中不做任何重试，是否重试由调用方决定。

use std::sync::Arc;

use reqwest::{Client, Url};
use tracing::{Instrument, debug, error, info, warn};
use uuid::Uuid;

use super::clock::Clock;
use super::directory::UserDirectory;
use super::error::DispatchError;
use super::signer::TokenSigner;
use super::token_cache::{CredentialStore, TokenCache};
use super::types::{DispatchResult, NotificationRequest};
use crate::config::ApnsConfig;
use crate::utils::token_prefix;

/// 网关响应中表示设备令牌失效的原因
pub const STALE_TOKEN_REASONS: [&str; 2] = ["BadDeviceToken", "Unregistered"];

const PUSH_TYPE: &str = "alert";

type HeaderList = Vec<(&'static str, String)>;

pub struct Dispatcher {
    config: ApnsConfig,
    directory: Arc<dyn UserDirectory>,
    tokens: TokenCache,
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
    client: Client,
}

impl Dispatcher {
    pub fn new(
        config: ApnsConfig,
        directory: Arc<dyn UserDirectory>,
        store: Arc<dyn CredentialStore>,
        signer: Arc<dyn TokenSigner>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DispatchError> {
        if config.device_url("").is_none() {
            return Err(DispatchError::InvalidGateway(config.gateway_url.clone()));
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DispatchError::ClientBuild(e.to_string()))?;

        let tokens = TokenCache::new(store, clock.clone(), config.token_ttl_secs);

        info!(
            key_id = %config.key_id,
            team_id = %config.team_id,
            bundle_id = %config.bundle_id,
            gateway = %config.gateway_url,
            "APNs dispatcher initialized"
        );

        Ok(Self {
            config,
            directory,
            tokens,
            signer,
            clock,
            client,
        })
    }

    /// 向用户发送一条推送通知
    ///
    /// 接收方不存在或存在多条记录时返回错误；其余情况都归类为 [`DispatchResult`]。
    pub async fn send(
        &self,
        recipient_user_id: i64,
        message: &str,
    ) -> Result<DispatchResult, DispatchError> {
        let span = tracing::info_span!(
            "apns_dispatch",
            dispatch_id = %Uuid::new_v4(),
            recipient = recipient_user_id
        );
        self.dispatch(recipient_user_id, message)
            .instrument(span)
            .await
    }

    async fn dispatch(
        &self,
        recipient_user_id: i64,
        message: &str,
    ) -> Result<DispatchResult, DispatchError> {
        let recipient = self
            .directory
            .find_user_by_id(recipient_user_id)
            .await
            .map_err(|e| {
                error!("Recipient lookup failed: {}", e);
                DispatchError::from(e)
            })?;

        let Some(device_token) = recipient.device_token() else {
            debug!("Recipient has no registered device");
            return Ok(DispatchResult::InvalidRecipient);
        };

        let request = NotificationRequest::new(
            device_token,
            message,
            self.clock.now(),
            self.config.notification_ttl_secs,
        );

        let jwt = self
            .tokens
            .get_valid_token(&self.config.key_id, self.signer.as_ref())
            .await?;

        self.deliver(&request, &jwt).await
    }

    fn request_headers(&self, request: &NotificationRequest, jwt: &str) -> HeaderList {
        vec![
            ("authorization", format!("bearer {}", jwt)),
            ("apns-push-type", PUSH_TYPE.to_string()),
            ("apns-expiration", request.expires_at.to_string()),
            ("apns-topic", self.config.bundle_id.clone()),
        ]
    }

    async fn deliver(
        &self,
        request: &NotificationRequest,
        jwt: &str,
    ) -> Result<DispatchResult, DispatchError> {
        let url = self
            .config
            .device_url(&request.recipient_device_token)
            .ok_or_else(|| DispatchError::InvalidGateway(self.config.gateway_url.clone()))?;
        let headers = self.request_headers(request, jwt);
        let payload = serde_json::to_string(&request.payload())?;

        let mut builder = self.client.post(url.clone()).body(payload.clone());
        for (name, value) in &headers {
            builder = builder.header(*name, value.as_str());
        }

        debug!(
            device_token = token_prefix(&request.recipient_device_token),
            badge = request.badge_count,
            expires_at = request.expires_at,
            "APNs request"
        );

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Ok(transport_failure(&url, &headers, &e)),
        };

        let status = response.status();
        let http_version = response.version();
        let response_headers = format!("{:?}", response.headers());

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Ok(transport_failure(&url, &headers, &e)),
        };

        if is_stale_token_response(&body) {
            // 设备令牌过期是常态，不记为错误
            info!(
                status = status.as_u16(),
                device_token = token_prefix(&request.recipient_device_token),
                "APNs rejected device token"
            );
            return Ok(DispatchResult::InvalidRecipient);
        }

        if !body.is_empty() {
            error!(
                status = status.as_u16(),
                http_version = ?http_version,
                response = %body,
                headers = ?headers,
                payload = %payload,
                response_headers = %response_headers,
                url = %url,
                "APNs gateway failure"
            );
            return Ok(DispatchResult::GatewayFailure);
        }

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                "APNs returned an empty body with a non-success status"
            );
        }

        info!(
            status = status.as_u16(),
            device_token = token_prefix(&request.recipient_device_token),
            "APNs notification delivered"
        );
        Ok(DispatchResult::Delivered)
    }
}

pub fn is_stale_token_response(body: &str) -> bool {
    STALE_TOKEN_REASONS.iter().any(|reason| body.contains(reason))
}

fn transport_failure(url: &Url, headers: &HeaderList, e: &reqwest::Error) -> DispatchResult {
    error!(
        url = %url,
        headers = ?headers,
        error = %e,
        error_debug = ?e,
        is_connect = e.is_connect(),
        is_timeout = e.is_timeout(),
        is_body = e.is_body() || e.is_decode(),
        "APNs transport failure"
    );
    DispatchResult::TransportFailure
}
