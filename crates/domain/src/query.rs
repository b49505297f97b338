//! # Mysfit 検索リクエスト
//!
//! `GET /mysfits` のクエリパラメータ（`filter`, `value`）を、ストアへ渡す前に
//! タグ付きのリクエスト型 [`MysfitQuery`] へ変換する。
//!
//! ## パラメータの解釈
//!
//! | `filter` | `value` | 結果 |
//! |----------|---------|------|
//! | なし | なし | [`MysfitQuery::ListAll`] |
//! | あり | あり | [`MysfitQuery::FilterBy`] |
//! | あり | なし | バリデーションエラー |
//! | なし | あり | バリデーションエラー |
//!
//! 空文字列（`?filter=`）は未指定として扱う。
//! 片方だけの指定は不完全なフィルタ状態をストアに流さないよう拒否する。

use serde::{Deserialize, Serialize};

use crate::DomainError;

define_validated_string! {
    /// フィルタ対象の項目名（例: `GoodEvil`, `LawChaos`）
    ///
    /// DynamoDB ストアでは `{項目名}Index` という名前のセカンダリインデックスを引く。
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 64 文字
    pub struct FilterField {
        label: "フィルタ項目",
        max_length: 64,
    }
}

define_validated_string! {
    /// フィルタ値（例: `Evil`, `Lawful`）
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 256 文字
    pub struct FilterValue {
        label: "フィルタ値",
        max_length: 256,
    }
}

/// ストアの検索操作に渡す検索条件 `{filter, value}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysfitFilter {
    #[serde(rename = "filter")]
    pub field: FilterField,
    pub value: FilterValue,
}

impl MysfitFilter {
    pub fn new(field: FilterField, value: FilterValue) -> Self {
        Self { field, value }
    }
}

/// 一覧取得リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MysfitQuery {
    /// 全件取得
    ListAll,
    /// 項目と値で絞り込み
    FilterBy(MysfitFilter),
}

impl MysfitQuery {
    /// クエリパラメータから検索リクエストを組み立てる
    ///
    /// # エラー
    ///
    /// - `filter` と `value` の片方だけが指定された場合
    /// - 値が最大長を超える場合
    pub fn from_params(
        filter: Option<String>,
        value: Option<String>,
    ) -> Result<Self, DomainError> {
        let filter = filter.filter(|s| !s.trim().is_empty());
        let value = value.filter(|s| !s.trim().is_empty());

        match (filter, value) {
            (None, None) => Ok(Self::ListAll),
            (Some(filter), Some(value)) => Ok(Self::FilterBy(MysfitFilter::new(
                FilterField::new(filter)?,
                FilterValue::new(value)?,
            ))),
            (Some(_), None) => Err(DomainError::Validation(
                "filter を指定する場合は value も指定してください".to_string(),
            )),
            (None, Some(_)) => Err(DomainError::Validation(
                "value を指定する場合は filter も指定してください".to_string(),
            )),
        }
    }
}
