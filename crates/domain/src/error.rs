//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成時に検出される入力違反を表現する。
//! API 層でこのエラーを受け取り、400 Bad Request に変換する。
//!
//! ## 使用例
//!
//! ```rust
//! use mysfits_domain::DomainError;
//!
//! fn validate_filter(filter: &str) -> Result<(), DomainError> {
//!     if filter.is_empty() {
//!         return Err(DomainError::Validation("フィルタ項目は必須です".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の超過
    /// - `filter` と `value` の片方だけが指定された
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
