use serde::Serialize;

use crate::utils::result_codes;

/// 客户端约定的返回体：`{"rc": n}`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ApiResult {
    pub rc: i32,
}

impl ApiResult {
    pub fn success() -> Self {
        Self {
            rc: result_codes::SUCCESS,
        }
    }

    pub fn failure(rc: i32) -> Self {
        Self { rc }
    }

    /// 结果码为 0 时视为成功
    pub fn from_rc(rc: i32) -> Self {
        if rc == result_codes::SUCCESS {
            Self::success()
        } else {
            Self::failure(rc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_like_original_responses() {
        assert_eq!(
            serde_json::to_string(&ApiResult::success()).unwrap(),
            r#"{"rc":0}"#
        );
        assert_eq!(
            serde_json::to_string(&ApiResult::from_rc(result_codes::APNS_FAILURE)).unwrap(),
            r#"{"rc":5}"#
        );
    }
}
