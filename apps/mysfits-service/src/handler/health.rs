//! # ヘルスチェックハンドラ
//!
//! ロードバランサーのターゲットグループが死活監視に使うエンドポイント。
//!
//! ## エンドポイント
//!
//! ```text
//! GET /
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "message": "Nothing here, used for health check. Try /mysfits instead."
//! }
//! ```

use axum::Json;
use mysfits_shared::HealthMessage;

/// ヘルスチェックエンドポイント
///
/// レコードストアには触れない。
pub async fn health_check() -> Json<HealthMessage> {
    Json(HealthMessage::default())
}
