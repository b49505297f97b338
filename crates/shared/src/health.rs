//! # ヘルスチェック共通型
//!
//! ルートエンドポイント `GET /` が返す固定メッセージを提供する。
//! ロードバランサーのターゲットグループはこのパスで死活監視する。

use serde::{Deserialize, Serialize};

/// ヘルスチェックの固定メッセージ
pub const HEALTH_CHECK_MESSAGE: &str = "Nothing here, used for health check. Try /mysfits instead.";

/// ヘルスチェックレスポンス
///
/// ## 使用例
///
/// ```
/// use mysfits_shared::HealthMessage;
///
/// let body = HealthMessage::default();
/// assert!(body.message.starts_with("Nothing here"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthMessage {
    pub message: String,
}

impl Default for HealthMessage {
    fn default() -> Self {
        Self {
            message: HEALTH_CHECK_MESSAGE.to_string(),
        }
    }
}
